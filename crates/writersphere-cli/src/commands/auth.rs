use writersphere_studio::account::{self, welcome_text};

use crate::app::App;
use crate::cli::AuthAction;

pub(super) async fn run(app: &App, action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::Signup { credentials, role } => {
            let outcome =
                account::sign_up(&app.client, &credentials.email, &credentials.password, role)
                    .await?;
            match outcome.message() {
                Some(message) => println!("{message}"),
                None => welcome(app),
            }
        }
        AuthAction::Signin { credentials } => {
            let outcome =
                account::sign_in(&app.client, &credentials.email, &credentials.password).await?;
            match outcome.message() {
                Some(message) => println!("{message}"),
                None => welcome(app),
            }
        }
        AuthAction::Signout => {
            app.client.auth().sign_out().await?;
            println!("Signed out.");
        }
        AuthAction::Whoami => match app.client.auth().session().await? {
            Some(session) => println!("{}", welcome_text(&session)),
            None => println!("Not signed in."),
        },
    }
    Ok(())
}

fn welcome(app: &App) {
    if let Some(session) = app.client.current_session() {
        println!("{}", welcome_text(&session));
    }
}
