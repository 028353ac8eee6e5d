//! Credential challenge state machine
//!
//! Decides what a submitted code means for the active credential kind:
//!
//! - No stored hash: the first code is cached and must be repeated. A
//!   matching repeat is hashed and saved; a different one starts over.
//! - Stored hash: the code is hashed and checked. Failures may be retried
//!   without limit.
//!
//! State only changes after every store call for a submission succeeded,
//! so a store failure leaves the challenge exactly where it was.

use crate::code::CredentialCode;
use crate::error::ChallengeError;
use crate::method::CredentialKind;
use crate::store::CredentialStore;

/// Where the challenge is in the enrollment or verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    /// No stored hash and no cached attempt
    AwaitingFirstInput,
    /// No stored hash; first attempt cached, waiting for the repeat
    AwaitingConfirmation,
    /// A hash is stored; codes are verified against it
    AwaitingVerification,
    /// Enrollment or verification succeeded; no further input accepted
    Completed,
}

/// Result of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First enrollment attempt cached; ask the user to repeat it
    ConfirmationRequested,
    /// The repeat did not match the first attempt; enrollment restarts
    ConfirmationMismatch,
    /// Both attempts matched and the hash was saved
    EnrollmentSucceeded,
    /// The code matched the stored hash
    VerificationSucceeded,
    /// The code did not match the stored hash
    VerificationFailed,
}

impl Outcome {
    /// Whether this outcome ends the challenge
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::EnrollmentSucceeded | Outcome::VerificationSucceeded
        )
    }
}

/// Enrollment and verification driver for one credential kind
pub struct CredentialChallenge<S> {
    /// Hash store collaborator
    store: S,
    /// Credential kind, fixed for the session
    kind: CredentialKind,
    /// Current state
    state: ChallengeState,
    /// First enrollment attempt, held until confirmed or rejected
    first_attempt: Option<CredentialCode>,
}

impl<S: CredentialStore> CredentialChallenge<S> {
    /// Start a challenge, resolving the initial state from the store
    pub async fn start(store: S, kind: CredentialKind) -> Result<Self, ChallengeError> {
        let enrolled = store.has_hash(kind.hash_key()).await?;

        let state = if enrolled {
            ChallengeState::AwaitingVerification
        } else {
            ChallengeState::AwaitingFirstInput
        };
        tracing::debug!(%kind, ?state, "Credential challenge started");

        Ok(Self {
            store,
            kind,
            state,
            first_attempt: None,
        })
    }

    /// Submit a completed code
    pub async fn submit(&mut self, code: CredentialCode) -> Result<Outcome, ChallengeError> {
        let outcome = match self.state {
            ChallengeState::AwaitingFirstInput => {
                self.first_attempt = Some(code);
                self.state = ChallengeState::AwaitingConfirmation;
                Outcome::ConfirmationRequested
            }
            ChallengeState::AwaitingConfirmation => self.confirm(code).await?,
            ChallengeState::AwaitingVerification => self.verify(code).await?,
            ChallengeState::Completed => return Err(ChallengeError::SessionCompleted),
        };

        tracing::debug!(kind = %self.kind, ?outcome, state = ?self.state, "Code submitted");
        Ok(outcome)
    }

    async fn confirm(&mut self, code: CredentialCode) -> Result<Outcome, ChallengeError> {
        if self.first_attempt.as_ref() != Some(&code) {
            self.first_attempt = None;
            self.state = ChallengeState::AwaitingFirstInput;
            return Ok(Outcome::ConfirmationMismatch);
        }

        let hash = self.store.compute_hash(&code)?;
        self.store.save_hash(self.kind.hash_key(), &hash).await?;

        self.first_attempt = None;
        self.state = ChallengeState::Completed;
        tracing::info!(kind = %self.kind, "Credential enrolled");
        Ok(Outcome::EnrollmentSucceeded)
    }

    async fn verify(&mut self, code: CredentialCode) -> Result<Outcome, ChallengeError> {
        let hash = self.store.compute_hash(&code)?;
        let valid = self.store.check_hash(self.kind.hash_key(), &hash).await?;

        if valid {
            self.state = ChallengeState::Completed;
            tracing::info!(kind = %self.kind, "Credential verified");
            Ok(Outcome::VerificationSucceeded)
        } else {
            tracing::info!(kind = %self.kind, "Credential verification failed");
            Ok(Outcome::VerificationFailed)
        }
    }

    /// Current state
    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Credential kind this challenge guards
    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// Whether the challenge ended successfully
    pub fn is_completed(&self) -> bool {
        self.state == ChallengeState::Completed
    }

    /// Whether this challenge enrolls a new credential
    pub fn is_enrolling(&self) -> bool {
        matches!(
            self.state,
            ChallengeState::AwaitingFirstInput | ChallengeState::AwaitingConfirmation
        )
    }

    /// Borrow the store
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockStore;

    async fn enrolled_store(kind: CredentialKind, code: &str) -> MockStore {
        let store = MockStore::default();
        let hash = store.compute_hash(&CredentialCode::from(code)).unwrap();
        store.save_hash(kind.hash_key(), &hash).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_initial_state_without_hash() {
        let challenge = CredentialChallenge::start(MockStore::default(), CredentialKind::Pattern)
            .await
            .unwrap();
        assert_eq!(challenge.state(), ChallengeState::AwaitingFirstInput);
        assert!(challenge.is_enrolling());
    }

    #[tokio::test]
    async fn test_initial_state_with_hash() {
        let store = enrolled_store(CredentialKind::Pin, "1234").await;
        let challenge = CredentialChallenge::start(store, CredentialKind::Pin)
            .await
            .unwrap();
        assert_eq!(challenge.state(), ChallengeState::AwaitingVerification);
    }

    #[tokio::test]
    async fn test_kinds_use_separate_keys() {
        let store = enrolled_store(CredentialKind::Pin, "1234").await;
        let challenge = CredentialChallenge::start(store, CredentialKind::Pattern)
            .await
            .unwrap();
        assert_eq!(challenge.state(), ChallengeState::AwaitingFirstInput);
    }

    #[tokio::test]
    async fn test_enrollment_round_trip() {
        let store = MockStore::default();
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pattern)
            .await
            .unwrap();

        let outcome = challenge.submit("048".into()).await.unwrap();
        assert_eq!(outcome, Outcome::ConfirmationRequested);
        assert_eq!(challenge.state(), ChallengeState::AwaitingConfirmation);
        assert_eq!(store.hash_calls(), 0);

        let outcome = challenge.submit("048".into()).await.unwrap();
        assert_eq!(outcome, Outcome::EnrollmentSucceeded);
        assert!(outcome.is_terminal());
        assert!(challenge.is_completed());
        assert_eq!(store.hash_calls(), 1);

        // A fresh session now verifies instead of enrolling
        assert!(store.has_hash(CredentialKind::Pattern.hash_key()).await.unwrap());
        let fresh = CredentialChallenge::start(store, CredentialKind::Pattern)
            .await
            .unwrap();
        assert_eq!(fresh.state(), ChallengeState::AwaitingVerification);
    }

    #[tokio::test]
    async fn test_confirmation_mismatch_restarts() {
        let store = MockStore::default();
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pattern)
            .await
            .unwrap();

        challenge.submit("048".into()).await.unwrap();
        let outcome = challenge.submit("037".into()).await.unwrap();

        assert_eq!(outcome, Outcome::ConfirmationMismatch);
        assert_eq!(challenge.state(), ChallengeState::AwaitingFirstInput);
        assert_eq!(store.hash_calls(), 0);
        assert!(!store.has_hash(CredentialKind::Pattern.hash_key()).await.unwrap());

        // The discarded attempt is not remembered
        assert_eq!(
            challenge.submit("037".into()).await.unwrap(),
            Outcome::ConfirmationRequested
        );
        assert_eq!(
            challenge.submit("037".into()).await.unwrap(),
            Outcome::EnrollmentSucceeded
        );
    }

    #[tokio::test]
    async fn test_confirmation_is_exact() {
        let mut challenge =
            CredentialChallenge::start(MockStore::default(), CredentialKind::Pin)
                .await
                .unwrap();

        challenge.submit("1234".into()).await.unwrap();
        assert_eq!(
            challenge.submit("1234 ".into()).await.unwrap(),
            Outcome::ConfirmationMismatch
        );
    }

    #[tokio::test]
    async fn test_verification_outcomes() {
        let store = enrolled_store(CredentialKind::Pin, "1234").await;
        let baseline = store.hash_calls();
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pin)
            .await
            .unwrap();

        let outcome = challenge.submit("4321".into()).await.unwrap();
        assert_eq!(outcome, Outcome::VerificationFailed);
        assert_eq!(challenge.state(), ChallengeState::AwaitingVerification);

        let outcome = challenge.submit("4321".into()).await.unwrap();
        assert_eq!(outcome, Outcome::VerificationFailed);

        let outcome = challenge.submit("1234".into()).await.unwrap();
        assert_eq!(outcome, Outcome::VerificationSucceeded);
        assert!(challenge.is_completed());

        // One hash per verification attempt
        assert_eq!(store.hash_calls() - baseline, 3);
    }

    #[tokio::test]
    async fn test_submit_after_completion() {
        let store = enrolled_store(CredentialKind::Pin, "1234").await;
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pin)
            .await
            .unwrap();

        challenge.submit("1234".into()).await.unwrap();
        let calls = store.hash_calls();

        let err = challenge.submit("1234".into()).await.unwrap_err();
        assert_eq!(err, ChallengeError::SessionCompleted);
        assert_eq!(store.hash_calls(), calls);
    }

    #[tokio::test]
    async fn test_store_failure_on_start() {
        let store = MockStore::default();
        store.set_unavailable(true);

        let result = CredentialChallenge::start(store, CredentialKind::Pin).await;
        assert!(matches!(result, Err(ChallengeError::Store(_))));
    }

    #[tokio::test]
    async fn test_store_failure_during_save_keeps_state() {
        let store = MockStore::default();
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pattern)
            .await
            .unwrap();

        challenge.submit("048".into()).await.unwrap();

        store.set_unavailable(true);
        let err = challenge.submit("048".into()).await.unwrap_err();
        assert!(matches!(err, ChallengeError::Store(_)));
        assert_eq!(challenge.state(), ChallengeState::AwaitingConfirmation);

        // The cached attempt survives, so the retry still confirms
        store.set_unavailable(false);
        assert_eq!(
            challenge.submit("048".into()).await.unwrap(),
            Outcome::EnrollmentSucceeded
        );
    }

    #[tokio::test]
    async fn test_store_failure_during_check_keeps_state() {
        let store = enrolled_store(CredentialKind::Pin, "1234").await;
        let mut challenge = CredentialChallenge::start(store.clone(), CredentialKind::Pin)
            .await
            .unwrap();

        store.set_unavailable(true);
        assert!(challenge.submit("1234".into()).await.is_err());
        assert_eq!(challenge.state(), ChallengeState::AwaitingVerification);
    }
}
