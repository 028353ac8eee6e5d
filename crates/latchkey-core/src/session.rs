//! Local authentication session
//!
//! Binds one capture surface to one credential challenge. The surface is
//! picked once from the method preferences and never changes; completed
//! codes flow into the challenge and results flow out as [`AuthEvent`]s.

use tokio::sync::mpsc::UnboundedSender;

use crate::challenge::{ChallengeState, CredentialChallenge, Outcome};
use crate::code::CredentialCode;
use crate::encoder::PatternEncoder;
use crate::error::{ChallengeError, CoreError, Result};
use crate::grid::{GridLayout, GridPoint};
use crate::method::{AuthMethods, CredentialKind};
use crate::pin::{PinBuffer, PinPush};
use crate::store::CredentialStore;

/// Events emitted to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A gesture or PIN finished with a non-empty code
    GestureCompleted {
        kind: CredentialKind,
        code: CredentialCode,
    },
    /// The challenge produced an outcome
    Outcome(Outcome),
    /// A store call failed; nothing changed
    StoreUnavailable(String),
    /// The user closed the dialog without authenticating
    Dismissed,
}

/// Active capture surface
#[derive(Debug)]
pub enum Capture {
    Pattern(PatternEncoder),
    Pin(PinBuffer),
}

impl Capture {
    /// Credential kind produced by this surface
    pub fn kind(&self) -> CredentialKind {
        match self {
            Capture::Pattern(_) => CredentialKind::Pattern,
            Capture::Pin(_) => CredentialKind::Pin,
        }
    }
}

/// One enrollment or verification dialog
pub struct LocalAuthSession<S> {
    challenge: CredentialChallenge<S>,
    capture: Capture,
    events: UnboundedSender<AuthEvent>,
}

impl<S: CredentialStore> LocalAuthSession<S> {
    /// Open a session for the kind selected by `methods`
    ///
    /// `layout` is only used when the pattern surface is selected.
    pub async fn open(
        store: S,
        methods: AuthMethods,
        layout: GridLayout,
        events: UnboundedSender<AuthEvent>,
    ) -> Result<Self> {
        let kind = methods.active_kind().ok_or(CoreError::NoCredentialMethod)?;

        let capture = match kind {
            CredentialKind::Pattern => Capture::Pattern(PatternEncoder::new(layout)?),
            CredentialKind::Pin => Capture::Pin(PinBuffer::new()),
        };

        let challenge = CredentialChallenge::start(store, kind).await?;

        Ok(Self {
            challenge,
            capture,
            events,
        })
    }

    /// Pointer pressed on the pattern canvas
    pub fn touch_down(&mut self, touch: GridPoint) {
        if let Capture::Pattern(encoder) = &mut self.capture {
            encoder.start_path(touch);
        }
    }

    /// Pointer dragged on the pattern canvas
    pub fn touch_move(&mut self, touch: GridPoint) {
        if let Capture::Pattern(encoder) = &mut self.capture {
            encoder.update_path(touch);
        }
    }

    /// Pointer released; submits the pattern when it selected any point
    pub async fn touch_up(&mut self) -> std::result::Result<Option<Outcome>, ChallengeError> {
        self.ensure_open()?;

        let code = match &mut self.capture {
            Capture::Pattern(encoder) => encoder.finish_gesture(),
            Capture::Pin(_) => None,
        };

        match code {
            Some(code) => self.complete(code).await.map(Some),
            None => Ok(None),
        }
    }

    /// Digit entered; submits the PIN on the fourth digit
    ///
    /// The buffer is emptied before submission whatever the outcome.
    pub async fn press_digit(
        &mut self,
        digit: char,
    ) -> std::result::Result<Option<Outcome>, ChallengeError> {
        self.ensure_open()?;

        let code = match &mut self.capture {
            Capture::Pin(buffer) => match buffer.push(digit) {
                PinPush::Completed => buffer.take(),
                PinPush::Added(_) | PinPush::Rejected => None,
            },
            Capture::Pattern(_) => None,
        };

        match code {
            Some(code) => self.complete(code).await.map(Some),
            None => Ok(None),
        }
    }

    /// Remove the last PIN digit; false when there was nothing to remove
    pub fn remove_digit(&mut self) -> bool {
        match &mut self.capture {
            Capture::Pin(buffer) => buffer.pop(),
            Capture::Pattern(_) => false,
        }
    }

    /// Close the dialog without authenticating
    pub fn dismiss(&mut self) {
        match &mut self.capture {
            Capture::Pattern(encoder) => encoder.clear(),
            Capture::Pin(buffer) => buffer.clear(),
        }
        self.emit(AuthEvent::Dismissed);
    }

    async fn complete(
        &mut self,
        code: CredentialCode,
    ) -> std::result::Result<Outcome, ChallengeError> {
        let kind = self.challenge.kind();
        self.emit(AuthEvent::GestureCompleted {
            kind,
            code: code.clone(),
        });

        match self.challenge.submit(code).await {
            Ok(outcome) => {
                self.emit(AuthEvent::Outcome(outcome));
                Ok(outcome)
            }
            Err(ChallengeError::Store(e)) => {
                tracing::warn!(%kind, "Credential store unavailable: {}", e);
                self.emit(AuthEvent::StoreUnavailable(e.to_string()));
                Err(ChallengeError::Store(e))
            }
            Err(e) => Err(e),
        }
    }

    fn ensure_open(&self) -> std::result::Result<(), ChallengeError> {
        if self.challenge.is_completed() {
            return Err(ChallengeError::SessionCompleted);
        }
        Ok(())
    }

    fn emit(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Auth event receiver dropped");
        }
    }

    /// Credential kind for this session
    pub fn kind(&self) -> CredentialKind {
        self.challenge.kind()
    }

    /// Current challenge state
    pub fn state(&self) -> ChallengeState {
        self.challenge.state()
    }

    /// Whether the user authenticated or enrolled successfully
    pub fn is_unlocked(&self) -> bool {
        self.challenge.is_completed()
    }

    /// Active capture surface, for rendering
    pub fn capture(&self) -> &Capture {
        &self.capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockStore;
    use tokio::sync::mpsc;

    fn drain(rx: &mut mpsc::UnboundedReceiver<AuthEvent>) -> Vec<AuthEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn pin_session(
        store: MockStore,
    ) -> (LocalAuthSession<MockStore>, mpsc::UnboundedReceiver<AuthEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = LocalAuthSession::open(store, AuthMethods::pin_only(), GridLayout::default(), tx)
            .await
            .unwrap();
        (session, rx)
    }

    async fn enter_pin(
        session: &mut LocalAuthSession<MockStore>,
        pin: &str,
    ) -> Option<Outcome> {
        let mut last = None;
        for digit in pin.chars() {
            last = session.press_digit(digit).await.unwrap();
        }
        last
    }

    #[tokio::test]
    async fn test_no_method_enabled() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result =
            LocalAuthSession::open(MockStore::default(), AuthMethods::none(), GridLayout::default(), tx)
                .await;
        assert!(matches!(result, Err(CoreError::NoCredentialMethod)));
    }

    #[tokio::test]
    async fn test_invalid_layout_rejected_for_pattern() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = LocalAuthSession::open(
            MockStore::default(),
            AuthMethods::pattern_only(),
            GridLayout::new(0, 3, 300, 300),
            tx,
        )
        .await;
        assert!(matches!(result, Err(CoreError::InvalidGeometry { .. })));
    }

    #[tokio::test]
    async fn test_surface_follows_preferences() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = LocalAuthSession::open(
            MockStore::default(),
            AuthMethods::pattern_only(),
            GridLayout::default(),
            tx,
        )
        .await
        .unwrap();
        assert!(matches!(session.capture(), Capture::Pattern(_)));
        assert_eq!(session.kind(), CredentialKind::Pattern);

        let (session, _rx) = pin_session(MockStore::default()).await;
        assert!(matches!(session.capture(), Capture::Pin(_)));
    }

    #[tokio::test]
    async fn test_pin_enrollment_flow() {
        let (mut session, mut rx) = pin_session(MockStore::default()).await;

        assert_eq!(session.press_digit('1').await.unwrap(), None);
        assert_eq!(
            enter_pin(&mut session, "234").await,
            Some(Outcome::ConfirmationRequested)
        );

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                AuthEvent::GestureCompleted {
                    kind: CredentialKind::Pin,
                    code: "1234".into(),
                },
                AuthEvent::Outcome(Outcome::ConfirmationRequested),
            ]
        );

        // Buffer was cleared on completion
        match session.capture() {
            Capture::Pin(buffer) => assert!(buffer.is_empty()),
            Capture::Pattern(_) => panic!("expected PIN surface"),
        }

        assert_eq!(
            enter_pin(&mut session, "1234").await,
            Some(Outcome::EnrollmentSucceeded)
        );
        assert!(session.is_unlocked());
    }

    #[tokio::test]
    async fn test_pin_buffer_cleared_after_failure() {
        let store = MockStore::default();
        let hash = store.compute_hash(&"1234".into()).unwrap();
        store.save_hash(CredentialKind::Pin.hash_key(), &hash).await.unwrap();

        let (mut session, mut rx) = pin_session(store).await;
        assert_eq!(
            enter_pin(&mut session, "9999").await,
            Some(Outcome::VerificationFailed)
        );
        assert_eq!(session.state(), ChallengeState::AwaitingVerification);
        assert!(!session.remove_digit());

        assert_eq!(
            enter_pin(&mut session, "1234").await,
            Some(Outcome::VerificationSucceeded)
        );

        let outcomes: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter_map(|event| match event {
                AuthEvent::Outcome(outcome) => Some(outcome),
                _ => None,
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![Outcome::VerificationFailed, Outcome::VerificationSucceeded]
        );
    }

    #[tokio::test]
    async fn test_remove_digit() {
        let (mut session, _rx) = pin_session(MockStore::default()).await;

        assert!(!session.remove_digit());
        session.press_digit('5').await.unwrap();
        assert!(session.remove_digit());
        assert!(!session.remove_digit());
    }

    #[tokio::test]
    async fn test_pattern_flow() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = LocalAuthSession::open(
            MockStore::default(),
            AuthMethods::pattern_only(),
            GridLayout::default(),
            tx,
        )
        .await
        .unwrap();

        // A gesture that misses every point emits nothing
        session.touch_down(GridPoint::new(100.0, 100.0));
        assert_eq!(session.touch_up().await.unwrap(), None);
        assert!(drain(&mut rx).is_empty());

        for _ in 0..2 {
            session.touch_down(GridPoint::new(50.0, 50.0));
            session.touch_move(GridPoint::new(150.0, 150.0));
            session.touch_move(GridPoint::new(250.0, 250.0));
            session.touch_up().await.unwrap();
        }

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                AuthEvent::GestureCompleted {
                    kind: CredentialKind::Pattern,
                    code: "048".into(),
                },
                AuthEvent::Outcome(Outcome::ConfirmationRequested),
                AuthEvent::GestureCompleted {
                    kind: CredentialKind::Pattern,
                    code: "048".into(),
                },
                AuthEvent::Outcome(Outcome::EnrollmentSucceeded),
            ]
        );
        assert!(session.is_unlocked());
    }

    #[tokio::test]
    async fn test_digits_ignored_on_pattern_surface() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = LocalAuthSession::open(
            MockStore::default(),
            AuthMethods::pattern_only(),
            GridLayout::default(),
            tx,
        )
        .await
        .unwrap();

        for digit in "1234".chars() {
            assert_eq!(session.press_digit(digit).await.unwrap(), None);
        }
        assert_eq!(session.state(), ChallengeState::AwaitingFirstInput);
    }

    #[tokio::test]
    async fn test_store_failure_emits_event() {
        let store = MockStore::default();
        let (mut session, mut rx) = pin_session(store.clone()).await;

        enter_pin(&mut session, "1234").await;
        drain(&mut rx);

        store.set_unavailable(true);
        for digit in "123".chars() {
            session.press_digit(digit).await.unwrap();
        }
        let err = session.press_digit('4').await.unwrap_err();
        assert!(matches!(err, ChallengeError::Store(_)));
        assert_eq!(session.state(), ChallengeState::AwaitingConfirmation);

        let events = drain(&mut rx);
        assert!(matches!(events.last(), Some(AuthEvent::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_input_after_unlock_rejected() {
        let (mut session, mut rx) = pin_session(MockStore::default()).await;
        enter_pin(&mut session, "1234").await;
        enter_pin(&mut session, "1234").await;
        drain(&mut rx);

        let err = session.press_digit('1').await.unwrap_err();
        assert_eq!(err, ChallengeError::SessionCompleted);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_dismiss() {
        let (mut session, mut rx) = pin_session(MockStore::default()).await;
        session.press_digit('1').await.unwrap();
        session.dismiss();

        assert!(!session.remove_digit());
        assert_eq!(drain(&mut rx), vec![AuthEvent::Dismissed]);
    }
}
