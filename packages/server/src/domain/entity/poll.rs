//! Poll lifecycle: creation, response collection, completion and history.
//!
//! The engine holds at most one collecting poll. Completion is a single
//! `Option::take` of the active slot, so a poll can produce its
//! [`PollResult`] only once no matter which trigger (timer, last response,
//! roster change) reaches it first.

use serde::{Deserialize, Serialize};

use crate::domain::{
    entity::roster::Participant,
    error::{PollError, ValueObjectError},
    value_object::{
        OptionLabel, ParticipantId, ParticipantName, PollId, Question, TimeLimit, Timestamp,
    },
};

/// Minimum number of non-empty options a poll must offer
pub const MIN_OPTION_COUNT: usize = 2;

/// Default maximum number of options a poll may offer
pub const DEFAULT_MAX_OPTION_COUNT: usize = 5;

/// Validated input for a new poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    question: Question,
    options: Vec<OptionLabel>,
    time_limit: TimeLimit,
}

impl PollDraft {
    /// Validate raw poll fields.
    ///
    /// Blank option labels are dropped before counting, so `["A", "", "B"]`
    /// is a valid two-option poll.
    pub fn new(
        question: String,
        options: Vec<String>,
        time_limit_secs: u64,
        max_options: usize,
    ) -> Result<Self, ValueObjectError> {
        let question = Question::new(question)?;
        let options = options
            .into_iter()
            .filter(|label| !label.trim().is_empty())
            .map(OptionLabel::new)
            .collect::<Result<Vec<_>, _>>()?;
        if options.len() < MIN_OPTION_COUNT {
            return Err(ValueObjectError::TooFewOptions {
                min: MIN_OPTION_COUNT,
                actual: options.len(),
            });
        }
        if options.len() > max_options {
            return Err(ValueObjectError::TooManyOptions {
                max: max_options,
                actual: options.len(),
            });
        }
        let time_limit = TimeLimit::from_secs(time_limit_secs)?;

        Ok(Self {
            question,
            options,
            time_limit,
        })
    }

    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }
}

/// How a second submission from the same participant is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePolicy {
    /// The latest submission replaces the earlier one
    #[default]
    Overwrite,
    /// The first submission is final
    FirstOnly,
}

/// One participant's answer to a poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub participant_id: ParticipantId,
    /// Name at submission time; kept even if the participant leaves
    pub voter_name: ParticipantName,
    pub option_index: usize,
    pub submitted_at: Timestamp,
}

/// A poll while it is collecting responses.
///
/// Only the engine's active slot holds one; once completed it survives only
/// as a [`PollResult`] in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub question: Question,
    pub options: Vec<OptionLabel>,
    pub time_limit: TimeLimit,
    pub created_at: Timestamp,
    /// At most one entry per participant, in first-submission order
    responses: Vec<Response>,
}

impl Poll {
    fn new(id: PollId, draft: PollDraft, created_at: Timestamp) -> Self {
        Self {
            id,
            question: draft.question,
            options: draft.options,
            time_limit: draft.time_limit,
            created_at,
            responses: Vec::new(),
        }
    }

    /// Index of the first option matching the submitted label
    pub fn option_index(&self, submitted: &str) -> Option<usize> {
        self.options.iter().position(|label| label.matches(submitted))
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn response_of(&self, participant_id: &ParticipantId) -> Option<&Response> {
        self.responses
            .iter()
            .find(|r| &r.participant_id == participant_id)
    }

    /// Whole seconds left before the countdown ends, rounded up
    pub fn remaining_secs(&self, now: Timestamp) -> u64 {
        let elapsed_ms = now.millis_since(self.created_at);
        let limit_ms = self.time_limit.as_secs() * 1000;
        limit_ms.saturating_sub(elapsed_ms).div_ceil(1000)
    }

    fn record(&mut self, response: Response, policy: ResponsePolicy) -> Result<(), PollError> {
        match self
            .responses
            .iter_mut()
            .find(|r| r.participant_id == response.participant_id)
        {
            Some(_) if policy == ResponsePolicy::FirstOnly => {
                Err(PollError::AlreadyResponded(response.participant_id))
            }
            Some(existing) => {
                *existing = response;
                Ok(())
            }
            None => {
                self.responses.push(response);
                Ok(())
            }
        }
    }

    /// True when the roster is non-empty and every member has a response
    fn everyone_responded(&self, roster: &[Participant]) -> bool {
        !roster.is_empty() && roster.iter().all(|p| self.response_of(&p.id).is_some())
    }

    fn tally(&self, roster: &[Participant], completed_at: Timestamp) -> PollResult {
        let total_responses = self.responses.len();
        // Responders who left are still counted as participants
        let departed_responders = self
            .responses
            .iter()
            .filter(|r| !roster.iter().any(|p| p.id == r.participant_id))
            .count();
        let total_participants = roster.len() + departed_responders;

        let options = self
            .options
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let voters: Vec<ParticipantName> = self
                    .responses
                    .iter()
                    .filter(|r| r.option_index == index)
                    .map(|r| r.voter_name.clone())
                    .collect();
                OptionTally {
                    label: label.clone(),
                    votes: voters.len(),
                    percentage: percentage(voters.len(), total_responses),
                    voters,
                }
            })
            .collect();

        PollResult {
            poll_id: self.id.clone(),
            question: self.question.clone(),
            total_participants,
            total_responses,
            options,
            completed_at,
        }
    }
}

/// `votes / total * 100`, rounded half up; 0 when nobody responded
fn percentage(votes: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((votes * 100 + total / 2) / total) as u32
}

/// Aggregated votes for one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTally {
    pub label: OptionLabel,
    pub votes: usize,
    pub percentage: u32,
    pub voters: Vec<ParticipantName>,
}

/// Immutable snapshot produced once when a poll completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    pub poll_id: PollId,
    pub question: Question,
    pub total_participants: usize,
    pub total_responses: usize,
    pub options: Vec<OptionTally>,
    pub completed_at: Timestamp,
}

/// Owner of the active poll slot and the result history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollEngine {
    active: Option<Poll>,
    history: Vec<PollResult>,
    policy: ResponsePolicy,
}

impl PollEngine {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            active: None,
            history: Vec::new(),
            policy,
        }
    }

    /// Start collecting for a new poll
    ///
    /// # Errors
    ///
    /// Returns `PollError::PollInProgress` while another poll is collecting
    pub fn create_poll(
        &mut self,
        id: PollId,
        draft: PollDraft,
        now: Timestamp,
    ) -> Result<&Poll, PollError> {
        if self.active.is_some() {
            return Err(PollError::PollInProgress);
        }
        Ok(self.active.insert(Poll::new(id, draft, now)))
    }

    /// Record a response and complete the poll if it was the last one missing
    ///
    /// `roster` is the list of currently known participants and must contain
    /// `participant`.
    pub fn submit_response(
        &mut self,
        participant: &Participant,
        submitted: &str,
        roster: &[Participant],
        now: Timestamp,
    ) -> Result<Option<PollResult>, PollError> {
        let policy = self.policy;
        let poll = self.active.as_mut().ok_or(PollError::NotCollecting)?;
        let option_index = poll
            .option_index(submitted)
            .ok_or_else(|| PollError::InvalidOption(submitted.trim().to_string()))?;

        poll.record(
            Response {
                participant_id: participant.id.clone(),
                voter_name: participant.name.clone(),
                option_index,
                submitted_at: now,
            },
            policy,
        )?;

        Ok(self.complete_if_everyone_responded(roster, now))
    }

    /// Complete the poll `poll_id` if it is still the collecting one
    ///
    /// Returns `None` when that poll already completed, so a late timer is a
    /// no-op.
    pub fn complete_poll(
        &mut self,
        poll_id: &PollId,
        roster: &[Participant],
        now: Timestamp,
    ) -> Option<PollResult> {
        if self.active.as_ref()?.id != *poll_id {
            return None;
        }
        self.complete_active(roster, now)
    }

    pub fn complete_if_everyone_responded(
        &mut self,
        roster: &[Participant],
        now: Timestamp,
    ) -> Option<PollResult> {
        if !self.active.as_ref()?.everyone_responded(roster) {
            return None;
        }
        self.complete_active(roster, now)
    }

    fn complete_active(&mut self, roster: &[Participant], now: Timestamp) -> Option<PollResult> {
        let poll = self.active.take()?;
        let result = poll.tally(roster, now);
        self.history.push(result.clone());
        Some(result)
    }

    pub fn active_poll(&self) -> Option<&Poll> {
        self.active.as_ref()
    }

    pub fn history(&self) -> &[PollResult] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{factory::IdFactory, value_object::ConnectionId};

    fn student(name: &str) -> Participant {
        Participant::new(
            IdFactory::participant_id(),
            ParticipantName::new(name.to_string()).unwrap(),
            ConnectionId::from_uuid(uuid::Uuid::new_v4()),
            Timestamp::new(0),
        )
    }

    fn draft(options: &[&str]) -> PollDraft {
        PollDraft::new(
            "Capital of France?".to_string(),
            options.iter().map(|o| o.to_string()).collect(),
            30,
            DEFAULT_MAX_OPTION_COUNT,
        )
        .unwrap()
    }

    fn engine_with_poll(options: &[&str]) -> (PollEngine, PollId) {
        let mut engine = PollEngine::default();
        let id = IdFactory::poll_id();
        engine
            .create_poll(id.clone(), draft(options), Timestamp::new(0))
            .unwrap();
        (engine, id)
    }

    #[test]
    fn test_draft_drops_blank_options() {
        // テスト項目: 空白の選択肢は数に含めない
        // when (操作):
        let result = PollDraft::new(
            "Q?".to_string(),
            vec!["A".to_string(), "  ".to_string(), "B".to_string()],
            60,
            5,
        );

        // then (期待する結果):
        let draft = result.unwrap();
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn test_draft_requires_two_options() {
        // テスト項目: 空白を除いた選択肢が 2 つ未満ならエラー
        // when (操作):
        let result = PollDraft::new(
            "Q?".to_string(),
            vec!["A".to_string(), "".to_string()],
            60,
            5,
        );

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::TooFewOptions { min: 2, actual: 1 }
        );
    }

    #[test]
    fn test_draft_rejects_too_many_options() {
        // テスト項目: 上限を超える選択肢はエラー
        // when (操作):
        let options = (0..6).map(|i| format!("option {i}")).collect();
        let result = PollDraft::new("Q?".to_string(), options, 60, 5);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::TooManyOptions { max: 5, actual: 6 }
        );
    }

    #[test]
    fn test_draft_rejects_empty_question() {
        // テスト項目: 質問文が空ならエラー
        // when (操作):
        let result = PollDraft::new(
            "".to_string(),
            vec!["A".to_string(), "B".to_string()],
            60,
            5,
        );

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::QuestionEmpty);
    }

    #[test]
    fn test_create_poll_while_collecting_fails() {
        // テスト項目: 回答受付中に新しい投票は作成できず、既存の投票は継続する
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);

        // when (操作):
        let result = engine.create_poll(
            IdFactory::poll_id(),
            draft(&["Yes", "No"]),
            Timestamp::new(10),
        );

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), PollError::PollInProgress);
        let active = engine.active_poll().unwrap();
        assert_eq!(active.id, id);
    }

    #[test]
    fn test_all_responded_completes_immediately() {
        // テスト項目: 全員が回答した時点で即座に完了する
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        let roster = vec![student("alice"), student("bob")];

        // when (操作):
        let first = engine
            .submit_response(&roster[0], "Paris", &roster, Timestamp::new(100))
            .unwrap();
        let second = engine
            .submit_response(&roster[1], "Paris", &roster, Timestamp::new(200))
            .unwrap();

        // then (期待する結果):
        assert!(first.is_none());
        let result = second.unwrap();
        assert_eq!(result.poll_id, id);
        assert_eq!(result.total_participants, 2);
        assert_eq!(result.total_responses, 2);
        assert_eq!(result.options[0].label.as_str(), "Paris");
        assert_eq!(result.options[0].percentage, 100);
        assert_eq!(result.options[1].label.as_str(), "London");
        assert_eq!(result.options[1].percentage, 0);
        assert!(engine.active_poll().is_none());
        assert_eq!(engine.history(), &[result]);
    }

    #[test]
    fn test_timer_completion_with_partial_responses() {
        // テスト項目: 一部のみ回答した状態でタイマー完了すると回答数と参加者数が区別される
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        let roster = vec![student("alice"), student("bob")];
        engine
            .submit_response(&roster[0], "London", &roster, Timestamp::new(100))
            .unwrap();

        // when (操作):
        let result = engine
            .complete_poll(&id, &roster, Timestamp::new(30_000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(result.total_responses, 1);
        assert_eq!(result.total_participants, 2);
        assert_eq!(result.options[1].votes, 1);
        assert_eq!(result.options[1].voters[0].as_str(), "alice");
    }

    #[test]
    fn test_completion_happens_once() {
        // テスト項目: 完了処理は 1 回だけ行われ、遅れたタイマーは何もしない
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        let roster = vec![student("alice")];
        let completed = engine
            .submit_response(&roster[0], "Paris", &roster, Timestamp::new(100))
            .unwrap();
        assert!(completed.is_some());

        // when (操作): タイマーが後から発火する
        let late = engine.complete_poll(&id, &roster, Timestamp::new(30_000));

        // then (期待する結果):
        assert!(late.is_none());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_completed_poll_moves_from_active_slot_to_history() {
        // テスト項目: 完了した投票は受付中の枠から外れ、結果として履歴に残る
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        assert_eq!(engine.active_poll().unwrap().id, id);

        // when (操作):
        let result = engine.complete_poll(&id, &[], Timestamp::new(30_000)).unwrap();

        // then (期待する結果):
        assert!(engine.active_poll().is_none());
        assert_eq!(engine.history(), &[result.clone()]);
        assert_eq!(result.poll_id, id);
    }

    #[test]
    fn test_stale_timer_does_not_complete_next_poll() {
        // テスト項目: 前回の投票のタイマーは次の投票を完了させない
        // given (前提条件):
        let (mut engine, old_id) = engine_with_poll(&["Paris", "London"]);
        engine.complete_poll(&old_id, &[], Timestamp::new(30_000));
        let new_id = IdFactory::poll_id();
        engine
            .create_poll(new_id.clone(), draft(&["Yes", "No"]), Timestamp::new(31_000))
            .unwrap();

        // when (操作):
        let result = engine.complete_poll(&old_id, &[], Timestamp::new(32_000));

        // then (期待する結果):
        assert!(result.is_none());
        assert_eq!(engine.active_poll().unwrap().id, new_id);
    }

    #[test]
    fn test_invalid_option_leaves_state_unchanged() {
        // テスト項目: 選択肢にない回答は InvalidOption となり状態は変わらない
        // given (前提条件):
        let (mut engine, _) = engine_with_poll(&["Paris", "London"]);
        let roster = vec![student("alice")];

        // when (操作):
        let result = engine.submit_response(&roster[0], "Berlin", &roster, Timestamp::new(100));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            PollError::InvalidOption("Berlin".to_string())
        );
        let active = engine.active_poll().unwrap();
        assert!(active.responses().is_empty());
    }

    #[test]
    fn test_submit_without_poll_fails() {
        // テスト項目: 投票がない状態での回答は NotCollecting
        // given (前提条件):
        let mut engine = PollEngine::default();
        let roster = vec![student("alice")];

        // when (操作):
        let result = engine.submit_response(&roster[0], "Paris", &roster, Timestamp::new(0));

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), PollError::NotCollecting);
    }

    #[test]
    fn test_resubmission_overwrites_by_default() {
        // テスト項目: 既定では再回答が前回の回答を上書きする
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        let roster = vec![student("alice"), student("bob")];

        // when (操作):
        engine
            .submit_response(&roster[0], "London", &roster, Timestamp::new(100))
            .unwrap();
        engine
            .submit_response(&roster[0], "Paris", &roster, Timestamp::new(200))
            .unwrap();
        let result = engine.complete_poll(&id, &roster, Timestamp::new(300)).unwrap();

        // then (期待する結果):
        assert_eq!(result.total_responses, 1);
        assert_eq!(result.options[0].votes, 1);
        assert_eq!(result.options[1].votes, 0);
    }

    #[test]
    fn test_resubmission_rejected_with_first_only_policy() {
        // テスト項目: FirstOnly ポリシーでは再回答が拒否される
        // given (前提条件):
        let mut engine = PollEngine::new(ResponsePolicy::FirstOnly);
        engine
            .create_poll(IdFactory::poll_id(), draft(&["Paris", "London"]), Timestamp::new(0))
            .unwrap();
        let roster = vec![student("alice"), student("bob")];
        engine
            .submit_response(&roster[0], "London", &roster, Timestamp::new(100))
            .unwrap();

        // when (操作):
        let result = engine.submit_response(&roster[0], "Paris", &roster, Timestamp::new(200));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            PollError::AlreadyResponded(roster[0].id.clone())
        );
        let active = engine.active_poll().unwrap();
        assert_eq!(active.response_of(&roster[0].id).unwrap().option_index, 1);
    }

    #[test]
    fn test_departed_responder_still_counted() {
        // テスト項目: 回答後に退出した参加者の回答は集計に残る
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);
        let alice = student("alice");
        let bob = student("bob");
        let full = vec![alice.clone(), bob.clone()];
        engine
            .submit_response(&alice, "Paris", &full, Timestamp::new(100))
            .unwrap();

        // when (操作): alice が退出した後に完了する
        let remaining = vec![bob];
        let result = engine
            .complete_poll(&id, &remaining, Timestamp::new(30_000))
            .unwrap();

        // then (期待する結果):
        assert_eq!(result.total_responses, 1);
        assert_eq!(result.total_participants, 2);
        assert!(result.total_responses <= result.total_participants);
    }

    #[test]
    fn test_empty_roster_waits_for_timer() {
        // テスト項目: 参加者がいない場合は全員回答扱いにせずタイマーを待つ
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["Paris", "London"]);

        // when (操作):
        let early = engine.complete_if_everyone_responded(&[], Timestamp::new(10));
        let timed_out = engine.complete_poll(&id, &[], Timestamp::new(30_000)).unwrap();

        // then (期待する結果):
        assert!(early.is_none());
        assert_eq!(timed_out.total_responses, 0);
        assert!(timed_out.options.iter().all(|o| o.percentage == 0));
    }

    #[test]
    fn test_percentages_sum_within_rounding_tolerance() {
        // テスト項目: 割合の合計は 100 ± (選択肢数 - 1) に収まる
        // given (前提条件):
        let (mut engine, id) = engine_with_poll(&["A", "B", "C"]);
        let roster: Vec<Participant> = (0..7).map(|i| student(&format!("s{i}"))).collect();
        for (i, p) in roster.iter().enumerate() {
            let choice = ["A", "B", "C"][i % 3];
            engine
                .submit_response(p, choice, &roster[..], Timestamp::new(i as i64))
                .ok();
        }

        // when (操作): 7 人全員の回答で完了済み
        let result = engine.history().last().cloned().unwrap();

        // then (期待する結果):
        assert_eq!(result.poll_id, id);
        let votes: usize = result.options.iter().map(|o| o.votes).sum();
        assert_eq!(votes, result.total_responses);
        let sum: u32 = result.options.iter().map(|o| o.percentage).sum();
        assert!((98..=102).contains(&sum), "sum was {sum}");
        // 3/7 = 42.86 -> 43, 2/7 = 28.57 -> 29
        assert_eq!(result.options[0].percentage, 43);
        assert_eq!(result.options[1].percentage, 29);
    }

    #[test]
    fn test_remaining_secs_rounds_up() {
        // テスト項目: 残り時間は秒単位で切り上げられる
        // given (前提条件):
        let (engine, _) = engine_with_poll(&["Paris", "London"]);
        let poll = engine.active_poll().unwrap();

        // then (期待する結果):
        assert_eq!(poll.remaining_secs(Timestamp::new(0)), 30);
        assert_eq!(poll.remaining_secs(Timestamp::new(10_500)), 20);
        assert_eq!(poll.remaining_secs(Timestamp::new(45_000)), 0);
    }
}
