use std::collections::{BTreeMap, BTreeSet};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::config::policy::PerformancePolicy;
use crate::curriculum::{self, Subject};
use crate::error::{PlanError, Result};
use super::model::{percent, DailyAggregate, OverallPerformance, TopicPerformance};
use super::report::{classify, DailyBreakdown, TrendReport, WeeklyReport};
use super::session::{check_answers, PerformanceSession, SessionId, SessionType, UpdatePerformanceRequest};

const REPORT_DAYS: i64 = 7;

/// Practice history for one student: open sessions plus the aggregates
/// sealed sessions were folded into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStore {
    next_session: u64,
    open: BTreeMap<SessionId, PerformanceSession>,
    topics: BTreeMap<String, TopicPerformance>,
    daily: BTreeMap<NaiveDate, DailyAggregate>,
    overall: OverallPerformance,
    #[serde(skip)]
    policy: PerformancePolicy,
}

impl PerformanceStore {
    pub fn new(policy: PerformancePolicy) -> Self {
        PerformanceStore {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &PerformancePolicy {
        &self.policy
    }

    pub fn begin<S: Into<String>>(&mut self, topic_id: S, session_type: SessionType, at: DateTime<Utc>) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        let topic_id = topic_id.into();
        tracing::debug!(session = %id, topic = %topic_id, "Session opened");
        self.open.insert(
            id,
            PerformanceSession {
                id,
                topic_id,
                session_type,
                start: at,
                end: None,
                questions_answered: 0,
                correct_answers: 0,
                duration_minutes: 0,
            },
        );
        id
    }

    /// Add answers to an open session.
    pub fn record(&mut self, id: SessionId, answered: u32, correct: u32) -> Result<()> {
        check_answers(answered, correct, "record_answers")?;
        let session = self.open_mut(id, "record_answers")?;
        session.questions_answered += answered;
        session.correct_answers += correct;
        Ok(())
    }

    /// Seal a session and fold it into the aggregates.
    pub fn end(&mut self, id: SessionId, at: DateTime<Utc>) -> Result<PerformanceSession> {
        let mut session = self.open.remove(&id).ok_or_else(|| self.missing(id, "end_session"))?;
        session.end = Some(at);
        session.duration_minutes = (at - session.start).num_minutes().max(0) as u32;
        self.fold(&session, at);
        Ok(session)
    }

    /// Fold a session that was timed and scored elsewhere.
    pub fn record_completed(&mut self, request: &UpdatePerformanceRequest, at: DateTime<Utc>) -> Result<PerformanceSession> {
        request.validate()?;
        let id = SessionId(self.next_session);
        self.next_session += 1;
        let session = PerformanceSession {
            id,
            topic_id: request.topic_id.clone(),
            session_type: request.session_type,
            start: at - Duration::minutes(request.time_spent_minutes as i64),
            end: Some(at),
            questions_answered: request.questions_answered,
            correct_answers: request.correct_answers,
            duration_minutes: request.time_spent_minutes,
        };
        self.fold(&session, at);
        Ok(session)
    }

    fn open_mut(&mut self, id: SessionId, stage: &'static str) -> Result<&mut PerformanceSession> {
        if !self.open.contains_key(&id) {
            return Err(self.missing(id, stage));
        }
        self.open.get_mut(&id).ok_or_else(|| PlanError::not_found(format!("{} is not open", id), stage))
    }

    fn missing(&self, id: SessionId, stage: &'static str) -> PlanError {
        if id.0 < self.next_session {
            PlanError::not_found(format!("{} is already sealed", id), stage)
        } else {
            PlanError::not_found(format!("{} does not exist", id), stage)
        }
    }

    fn fold(&mut self, session: &PerformanceSession, at: DateTime<Utc>) {
        self.fold_topic(session, at);

        let day = session.start.date_naive();
        let aggregate = self.daily.entry(day).or_insert_with(|| DailyAggregate::empty(day));
        aggregate.study_minutes += session.duration_minutes;
        aggregate.questions_solved += session.questions_answered;
        aggregate.correct_answers += session.correct_answers;
        aggregate.session_count += 1;
        aggregate.topics.insert(session.topic_id.clone());

        self.overall.total_questions += session.questions_answered;
        self.overall.correct_answers += session.correct_answers;
        self.overall.study_minutes_total += session.duration_minutes;

        self.update_streak(day);
        tracing::debug!(
            session = %session.id,
            topic = %session.topic_id,
            answered = session.questions_answered,
            correct = session.correct_answers,
            minutes = session.duration_minutes,
            streak = self.overall.streak_days,
            "Session folded"
        );
    }

    fn fold_topic(&mut self, session: &PerformanceSession, at: DateTime<Utc>) {
        let review_threshold = self.policy.review_threshold;
        let stale_after = Duration::days(self.policy.stale_after_days);

        let topic = self
            .topics
            .entry(session.topic_id.clone())
            .or_insert_with(|| TopicPerformance {
                topic_id: session.topic_id.clone(),
                topic_name: curriculum::topic_display_name(&session.topic_id),
                questions_solved: 0,
                correct_answers: 0,
                time_spent_minutes: 0,
                last_studied: at,
                needs_review: false,
            });
        let previous = topic.last_studied;

        topic.questions_solved += session.questions_answered;
        topic.correct_answers += session.correct_answers;
        topic.time_spent_minutes += session.duration_minutes;
        topic.last_studied = at;
        topic.needs_review = topic.success_rate() < review_threshold || at - previous > stale_after;
    }

    /// `today` is the day the session's minutes were booked on.
    fn update_streak(&mut self, today: NaiveDate) {
        if self.overall.streak_counted_on == Some(today) {
            return;
        }
        if !self.studied_on(today) {
            return;
        }
        let yesterday = today - Duration::days(1);
        self.overall.streak_days = if self.studied_on(yesterday) {
            self.overall.streak_days + 1
        } else {
            self.policy.streak_reset_value
        };
        self.overall.streak_counted_on = Some(today);
    }

    fn studied_on(&self, day: NaiveDate) -> bool {
        self.daily.get(&day).map_or(false, |d| d.study_minutes > 0)
    }

    pub fn open_session(&self, id: SessionId) -> Option<&PerformanceSession> {
        self.open.get(&id)
    }

    pub fn topic(&self, topic_id: &str) -> Option<&TopicPerformance> {
        self.topics.get(topic_id)
    }

    pub fn topics(&self) -> impl Iterator<Item = &TopicPerformance> {
        self.topics.values()
    }

    pub fn daily(&self, day: NaiveDate) -> Option<&DailyAggregate> {
        self.daily.get(&day)
    }

    pub fn overall(&self) -> &OverallPerformance {
        &self.overall
    }

    pub fn streak_days(&self) -> u32 {
        self.overall.streak_days
    }

    /// Mean success rate over the subject's topics, `None` when none were studied.
    pub fn subject_success_rate(&self, subject: Subject) -> Option<f64> {
        let rates: Vec<f64> = self
            .topics
            .values()
            .filter(|t| Subject::from_topic_id(&t.topic_id) == Some(subject))
            .map(|t| t.success_rate())
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        }
    }

    pub fn weekly_report(&self, as_of: NaiveDate) -> WeeklyReport {
        let mut report = WeeklyReport {
            as_of,
            total_study_minutes: 0,
            total_questions: 0,
            correct_answers: 0,
            session_count: 0,
            topics_studied: 0,
            average_accuracy: 0.0,
            average_study_minutes: 0.0,
            daily_breakdown: Vec::with_capacity(REPORT_DAYS as usize),
        };
        let mut topics = BTreeSet::new();

        for offset in (0..REPORT_DAYS).rev() {
            let date = as_of - Duration::days(offset);
            let day = self.daily.get(&date);
            if let Some(d) = day {
                report.total_study_minutes += d.study_minutes;
                report.total_questions += d.questions_solved;
                report.correct_answers += d.correct_answers;
                report.session_count += d.session_count;
                topics.extend(d.topics.iter().cloned());
            }
            report.daily_breakdown.push(DailyBreakdown {
                date,
                study_minutes: day.map_or(0, |d| d.study_minutes),
                questions: day.map_or(0, |d| d.questions_solved),
                accuracy: day.map_or(0.0, |d| d.accuracy()),
            });
        }

        report.topics_studied = topics.len();
        report.average_accuracy = percent(report.correct_answers, report.total_questions);
        report.average_study_minutes = report.total_study_minutes as f64 / REPORT_DAYS as f64;
        report
    }

    /// Compare the recent half of the trend window with the older half.
    pub fn trend(&self, as_of: NaiveDate) -> TrendReport {
        let window = self.policy.trend_window_days.max(2) as i64;
        let mut accuracy = Vec::with_capacity(window as usize);
        let mut study_minutes = Vec::with_capacity(window as usize);
        let mut question_volume = Vec::with_capacity(window as usize);

        for offset in (0..window).rev() {
            let day = self.daily.get(&(as_of - Duration::days(offset)));
            accuracy.push(day.map_or(0.0, |d| d.accuracy()));
            study_minutes.push(day.map_or(0, |d| d.study_minutes));
            question_volume.push(day.map_or(0, |d| d.questions_solved));
        }

        let half = (window / 2) as usize;
        let mean = |xs: &[f64]| xs.iter().sum::<f64>() / half as f64;
        let older_accuracy = mean(&accuracy[..half]);
        let recent_accuracy = mean(&accuracy[accuracy.len() - half..]);

        TrendReport {
            as_of,
            trend: classify(recent_accuracy - older_accuracy, self.policy.trend_delta),
            accuracy,
            study_minutes,
            question_volume,
            recent_accuracy,
            older_accuracy,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a snapshot; the policy is not part of it.
    pub fn from_json(raw: &str, policy: PerformancePolicy) -> Result<Self> {
        let mut store: PerformanceStore = serde_json::from_str(raw)
            .map_err(|e| PlanError::from(e).with_context("performance snapshot"))?;
        store.policy = policy;
        Ok(store)
    }
}
