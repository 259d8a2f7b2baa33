//! Execution of parsed CLI commands against the API.
//!
//! Every command produces a JSON value for the caller to print.

use serde_json::{json, Value};

use super::args::{CliCommand, DatasetCommand};
use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginForm, RegisterRequest};

/// Run a command that talks to the API (or the local session).
///
/// `Version`, `Help` and `Invalid` are handled before a client exists and
/// come back here as [`ApiError::InvalidInput`].
pub async fn execute(client: &ApiClient, command: CliCommand) -> ApiResult<Value> {
    match command {
        CliCommand::Register {
            email,
            username,
            password,
            full_name,
        } => {
            let request = RegisterRequest {
                email,
                username,
                password,
                full_name,
            };
            let user = client.auth().register(&request).await?;
            Ok(serde_json::to_value(user)?)
        }
        CliCommand::Login { username, password } => {
            client
                .auth()
                .sign_in(LoginForm::new(username.clone(), password))
                .await?;
            Ok(json!({ "status": "signed in", "username": username }))
        }
        CliCommand::Logout => {
            client.auth().logout().await;
            Ok(json!({ "status": "signed out" }))
        }
        CliCommand::WhoAmI => Ok(whoami(client)),
        CliCommand::Datasets(command) => datasets(client, command).await,
        CliCommand::Sheets { dataset_id } => {
            Ok(serde_json::to_value(client.sheets().list(dataset_id).await?)?)
        }
        CliCommand::Charts { sheet_id } => {
            Ok(serde_json::to_value(client.charts().list(sheet_id).await?)?)
        }
        CliCommand::Version | CliCommand::Help => Err(ApiError::InvalidInput {
            message: "Nothing to execute".to_string(),
        }),
        CliCommand::Invalid(message) => Err(ApiError::InvalidInput { message }),
    }
}

async fn datasets(client: &ApiClient, command: DatasetCommand) -> ApiResult<Value> {
    let api = client.datasets();
    let value = match command {
        DatasetCommand::List => serde_json::to_value(api.list().await?)?,
        DatasetCommand::Show { id } => serde_json::to_value(api.get(id).await?)?,
        DatasetCommand::Rows {
            id,
            page,
            page_size,
        } => serde_json::to_value(api.get_page(id, page, page_size).await?)?,
        DatasetCommand::Upload {
            name,
            path,
            description,
        } => serde_json::to_value(
            api.upload_path(&name, &path, description.as_deref())
                .await?,
        )?,
        DatasetCommand::Delete { id } => {
            api.delete(id).await?;
            json!({ "status": "deleted", "id": id })
        }
    };
    Ok(value)
}

/// Local session summary. The user id is read from the token, unverified.
fn whoami(client: &ApiClient) -> Value {
    let session = client.store().session();
    match session.user {
        Some(user) => json!({
            "authenticated": session.is_authenticated,
            "user_id": user.user_id,
            "expires_at": user.expires_at.map(|t| t.to_rfc3339()),
            "expired": user.is_expired(),
        }),
        None => json!({ "authenticated": session.is_authenticated }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::auth::TokenStore;
    use crate::traits::Method;
    use std::sync::Arc;

    fn client(http: &MockHttpClient) -> ApiClient {
        let store = TokenStore::new(Arc::new(InMemoryCredentials::new()));
        ApiClient::new("http://api.test", Arc::new(http.clone()), Arc::new(store))
    }

    #[tokio::test]
    async fn test_whoami_signed_out() {
        let client = client(&MockHttpClient::new());
        let value = execute(&client, CliCommand::WhoAmI).await.unwrap();
        assert_eq!(value, json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Post,
            "http://api.test/api/auth/login",
            MockResponse::json(200, json!({"access_token": "A", "refresh_token": "B"})),
        );
        let client = client(&http);

        let value = execute(
            &client,
            CliCommand::Login {
                username: "alice".to_string(),
                password: "secret".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(value["status"], "signed in");
        assert!(client.store().is_authenticated());

        execute(&client, CliCommand::Logout).await.unwrap();
        assert!(!client.store().is_authenticated());
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_sheets_list_passes_filter() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Get,
            "http://api.test/api/sheets",
            MockResponse::json(200, json!([])),
        );
        let client = client(&http);

        let value = execute(&client, CliCommand::Sheets { dataset_id: Some(3) })
            .await
            .unwrap();

        assert_eq!(value, json!([]));
        assert_eq!(http.get_requests()[0].url, "http://api.test/api/sheets?dataset_id=3");
    }

    #[tokio::test]
    async fn test_invalid_command_is_input_error() {
        let client = client(&MockHttpClient::new());
        let err = execute(&client, CliCommand::Invalid("bad".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "bad");
    }
}
