//! Countdown handle for the collecting poll.

use tokio::{sync::Mutex, task::AbortHandle};

use crate::domain::PollId;

/// Holds the abort handle of the countdown task armed for the active poll
#[derive(Default)]
pub struct PollTimer {
    slot: Mutex<Option<(PollId, AbortHandle)>>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the countdown for `poll_id`, aborting any older one
    pub async fn arm(&self, poll_id: PollId, handle: AbortHandle) {
        let mut slot = self.slot.lock().await;
        if let Some((stale, old)) = slot.replace((poll_id, handle)) {
            tracing::debug!("Replacing countdown of poll '{}'", stale);
            old.abort();
        }
    }

    /// Abort the countdown of `poll_id` after it completed early
    pub async fn cancel(&self, poll_id: &PollId) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.take_if(|(armed, _)| armed == poll_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forget the countdown of `poll_id` from inside its own task
    pub async fn clear(&self, poll_id: &PollId) {
        let mut slot = self.slot.lock().await;
        slot.take_if(|(armed, _)| armed == poll_id);
    }

    #[cfg(test)]
    pub async fn armed_poll(&self) -> Option<PollId> {
        let slot = self.slot.lock().await;
        slot.as_ref().map(|(poll_id, _)| poll_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdFactory;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_matching_countdown() {
        // テスト項目: 同じ投票 ID のカウントダウンだけが中止される
        // given (前提条件):
        let timer = PollTimer::new();
        let poll_id = IdFactory::poll_id();
        let task = tokio::spawn(tokio::time::sleep(Duration::from_secs(30)));
        timer.arm(poll_id.clone(), task.abort_handle()).await;

        // when (操作):
        let other = timer.cancel(&IdFactory::poll_id()).await;
        let matching = timer.cancel(&poll_id).await;

        // then (期待する結果):
        assert!(!other);
        assert!(matching);
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(timer.armed_poll().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_replaces_stale_countdown() {
        // テスト項目: 新しいカウントダウンを登録すると古いものは中止される
        // given (前提条件):
        let timer = PollTimer::new();
        let first = tokio::spawn(tokio::time::sleep(Duration::from_secs(30)));
        timer.arm(IdFactory::poll_id(), first.abort_handle()).await;
        let second_id = IdFactory::poll_id();
        let second = tokio::spawn(tokio::time::sleep(Duration::from_secs(30)));

        // when (操作):
        timer.arm(second_id.clone(), second.abort_handle()).await;

        // then (期待する結果):
        assert!(first.await.unwrap_err().is_cancelled());
        assert_eq!(timer.armed_poll().await, Some(second_id));
        second.abort();
    }
}
