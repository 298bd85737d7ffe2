//! Sign-up, sign-in, and the writer gate.
//!
//! Every dashboard workflow starts with [`require_writer`]: anonymous users
//! and readers are turned away before any table is touched.

use tokio::sync::watch;

use writersphere_client::{BackendClient, Session, SignUpResponse};
use writersphere_core::{Role, UserId};

use crate::{Error, Result};

/// Shortest password the sign-up and sign-in forms accept.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Result of a sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Signed in as a writer; continue to the dashboard.
    Writer,
    /// Signed in as a reader.
    Reader,
    /// Account created; the email must be confirmed first.
    ConfirmEmail,
    /// The email already has an account; switch to sign-in.
    AlreadyRegistered,
}

impl SignUpOutcome {
    /// Message to show, if the outcome is not a redirect.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SignUpOutcome::Writer => None,
            SignUpOutcome::Reader => {
                Some("Signed up as reader. You can explore without dashboard.")
            }
            SignUpOutcome::ConfirmEmail => {
                Some("Check your inbox to confirm your email before signing in.")
            }
            SignUpOutcome::AlreadyRegistered => {
                Some("This email is already registered. Switching to sign in.")
            }
        }
    }
}

/// Result of a sign-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Continue to the dashboard.
    Writer,
    /// Stay on the home page.
    Reader,
}

impl SignInOutcome {
    /// Message to show, if the outcome is not a redirect.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SignInOutcome::Writer => None,
            SignInOutcome::Reader => Some("Signed in as reader."),
        }
    }
}

fn check_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::validation_field("email", "Email is required."));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation_field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        ));
    }
    Ok(())
}

/// Map a raw sign-up response onto what the user sees next.
///
/// A session means the user is signed in: writers (by stored role or by the
/// role just chosen) go to the dashboard. No session means the email needs
/// confirming. An error mentioning "already" is an existing account; any
/// other error is returned as is.
pub fn interpret_sign_up(
    response: writersphere_client::Result<SignUpResponse>,
    chosen: Role,
) -> Result<SignUpOutcome> {
    match response {
        Ok(SignUpResponse::Session(session)) => {
            if session.role() == Some(Role::Writer) || chosen == Role::Writer {
                Ok(SignUpOutcome::Writer)
            } else {
                Ok(SignUpOutcome::Reader)
            }
        }
        Ok(SignUpResponse::ConfirmationRequired(_)) => Ok(SignUpOutcome::ConfirmEmail),
        Err(err) if err.to_string().to_lowercase().contains("already") => {
            Ok(SignUpOutcome::AlreadyRegistered)
        }
        Err(err) => Err(err.into()),
    }
}

/// Create an account with the chosen role.
pub async fn sign_up(
    client: &BackendClient,
    email: &str,
    password: &str,
    role: Role,
) -> Result<SignUpOutcome> {
    check_credentials(email, password)?;
    let outcome = interpret_sign_up(client.auth().sign_up(email, password, role).await, role)?;
    tracing::debug!(?outcome, %role, "sign-up finished");
    Ok(outcome)
}

/// Sign in; the stored role decides where to go.
pub async fn sign_in(client: &BackendClient, email: &str, password: &str) -> Result<SignInOutcome> {
    check_credentials(email, password)?;
    let session = client.auth().sign_in_with_password(email, password).await?;
    Ok(match session.role() {
        Some(Role::Writer) => SignInOutcome::Writer,
        _ => SignInOutcome::Reader,
    })
}

/// The writer's id, or `Forbidden` for anonymous users and readers.
pub fn require_writer(session: Option<&Session>) -> Result<UserId> {
    match session {
        None => Err(Error::Forbidden("Sign in as a writer to continue.".into())),
        Some(s) if s.role() == Some(Role::Writer) => Ok(s.user_id()),
        Some(_) => Err(Error::Forbidden(
            "Only writers can use the dashboard.".into(),
        )),
    }
}

/// Current session through the client (refreshed if expired), gated to writers.
pub async fn current_writer(client: &BackendClient) -> Result<UserId> {
    let session = client.auth().session().await?;
    require_writer(session.as_ref())
}

/// Resolve once the session stops belonging to a writer: sign-out, expiry
/// without refresh, or a role change. Also resolves if the client is gone.
pub async fn writer_gate_closed(mut sessions: watch::Receiver<Option<Session>>) {
    loop {
        if require_writer(sessions.borrow_and_update().as_ref()).is_err() {
            return;
        }
        if sessions.changed().await.is_err() {
            return;
        }
    }
}

/// Greeting for a signed-in user.
pub fn welcome_text(session: &Session) -> String {
    let greeting = match session.user.email.as_deref() {
        Some(email) if !email.is_empty() => format!("Welcome, {email}!"),
        _ => "Welcome!".to_string(),
    };
    let line = match session.role() {
        Some(Role::Reader) => "You're signed in as a reader. Enjoy exploring!",
        _ => "You're signed in as a writer. Check your dashboard for more.",
    };
    format!("{greeting}\n{line}")
}
