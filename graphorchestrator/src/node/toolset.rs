//! ToolSet node: a Processing node whose action is a remote HTTP call to a
//! tool server (the server itself is an out-of-scope external collaborator;
//! this is only the client side of the wire protocol described in §6).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GraphError;
use crate::state::State;

#[derive(Debug, serde::Serialize)]
struct ToolRequest<'a, T> {
    messages: &'a [T],
}

#[derive(Debug, serde::Deserialize)]
struct ToolResponse<T> {
    messages: Vec<T>,
}

/// `POST {base_url}/tools/{tool_name}` with `{"messages": [...]}`, parsing a
/// `{"messages": [...]}` response into a new `State`.
#[derive(Clone)]
pub struct ToolSetNode {
    pub(crate) base_url: String,
    pub(crate) tool_name: String,
    pub(crate) auth_header: Option<String>,
    client: reqwest::Client,
}

impl ToolSetNode {
    pub fn new(base_url: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tool_name: tool_name.into(),
            auth_header: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", token.into()));
        self
    }

    pub async fn execute<T>(&self, state: State<T>) -> Result<State<T>, GraphError>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let url = format!(
            "{}/tools/{}",
            self.base_url.trim_end_matches('/'),
            self.tool_name
        );
        let mut req = self
            .client
            .post(&url)
            .json(&ToolRequest {
                messages: &state.messages,
            });
        if let Some(auth) = &self.auth_header {
            req = req.header("Authorization", auth);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| GraphError::Transport(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(GraphError::Transport(format!(
                "toolset '{}' returned status {}",
                self.tool_name,
                resp.status()
            )));
        }

        let body: ToolResponse<T> = resp
            .json()
            .await
            .map_err(|e| GraphError::Transport(format!("response decode failed: {e}")))?;

        Ok(State::new(body.messages))
    }
}

impl std::fmt::Debug for ToolSetNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSetNode")
            .field("base_url", &self.base_url)
            .field("tool_name", &self.tool_name)
            .finish()
    }
}
