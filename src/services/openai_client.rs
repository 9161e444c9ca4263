use anyhow::Context;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::board_member::BoardMember;

use super::{BoardExtract, TextTruncator};

pub const OPENAI_MODEL: &str = "gpt-3.5-turbo-1106";
pub const MAX_TOKENS: usize = 16385;
pub const RESERVED_OUTPUT_TOKENS: usize = 1000;

#[derive(Deserialize)]
struct BoardMembersResponse {
    #[serde(rename = "boardMembers", default)]
    board_members: Option<Vec<BoardMember>>,
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    truncator: TextTruncator,
}

impl OpenaiClient {
    pub fn new(
        api_key: String,
        api_base: Option<String>,
        model: String,
        truncator: TextTruncator,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = api_base {
            config = config.with_api_base(api_base);
        }

        OpenaiClient {
            client: Client::with_config(config),
            model,
            truncator,
        }
    }

    /// Asks the model for the board of `name` using only `text`.
    ///
    /// `Ok(None)` means the model found no board in the text. A reply that is
    /// not the expected JSON object is an error.
    pub async fn get_board_members_from_text(
        &self,
        text: &str,
        name: &str,
    ) -> anyhow::Result<Option<Vec<BoardMember>>> {
        let text = self.truncator.truncate(text);

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(build_board_prompt(name))
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("Chat completion request failed")?;
        log::debug!("Response: {:?}", response);

        let first_choice = response
            .choices
            .first()
            .context("No choices in Openai response")?
            .message
            .content
            .clone()
            .context("No content")?;

        parse_board_members(&first_choice)
    }
}

#[async_trait]
impl BoardExtract for OpenaiClient {
    async fn extract_board(
        &self,
        text: &str,
        name: &str,
    ) -> anyhow::Result<Option<Vec<BoardMember>>> {
        self.get_board_members_from_text(text, name).await
    }
}

pub fn build_board_prompt(name: &str) -> String {
    format!(
        "You will be provided with text from {name}'s website that might list {name}'s board of directors \
(also known as the \"board\" or \"board of trustees\" or \"directors\" or \"trustees\"), and your task is \
to extract a list of people who are on {name}'s board using only the provided text. Return the list in a \
JSON array under the key 'boardMembers'. Each board member should have the following fields: name, bio, \
link. The bio field is a block of text that describes the board member, and can be null if it's not \
present. The link field is a url for more info about the board member, and can be null if it's not \
present. If the board of directors cannot be found in the provided text then set 'boardMembers' equal \
to null. Do not return people mentioned the text if there's no evidence that they're on {name}'s board."
    )
}

pub fn parse_board_members(content: &str) -> anyhow::Result<Option<Vec<BoardMember>>> {
    let parsed: BoardMembersResponse = serde_json::from_str(content)
        .with_context(|| format!("Malformed board members response: {}", content))?;

    Ok(parsed.board_members)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, Request, ResponseTemplate,
    };

    use super::{
        build_board_prompt, parse_board_members, OpenaiClient, MAX_TOKENS, OPENAI_MODEL,
        RESERVED_OUTPUT_TOKENS,
    };
    use crate::services::TextTruncator;

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1700000000,
            "model": OPENAI_MODEL,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 10, "total_tokens": 20}
        })
    }

    fn client(server: &MockServer) -> OpenaiClient {
        client_with_budget(server, MAX_TOKENS, RESERVED_OUTPUT_TOKENS)
    }

    fn client_with_budget(server: &MockServer, max: usize, reserved: usize) -> OpenaiClient {
        OpenaiClient::new(
            "test-key".to_string(),
            Some(server.uri()),
            OPENAI_MODEL.to_string(),
            TextTruncator::for_model(OPENAI_MODEL, max, reserved).unwrap(),
        )
    }

    #[test]
    fn parse_members_list() {
        let board = parse_board_members(
            r#"{"boardMembers": [
                {"name": "Jane Doe", "bio": "Chair since 2019", "link": "https://a.org/jane"},
                {"name": "John Roe", "bio": null, "link": null}
            ]}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "Jane Doe");
        assert_eq!(board[0].link.as_deref(), Some("https://a.org/jane"));
        assert_eq!(board[1].bio, None);
    }

    #[test]
    fn parse_null_and_missing_board() {
        assert_eq!(parse_board_members(r#"{"boardMembers": null}"#).unwrap(), None);
        assert_eq!(parse_board_members("{}").unwrap(), None);
        assert_eq!(
            parse_board_members(r#"{"boardMembers": []}"#).unwrap(),
            Some(vec![])
        );
    }

    #[test]
    fn parse_malformed_is_error() {
        assert!(parse_board_members("not json").is_err());
        assert!(parse_board_members(r#"{"boardMembers": [{"bio": "no name"}]}"#).is_err());
    }

    #[test]
    fn prompt_names_the_organization() {
        let prompt = build_board_prompt("Acme");
        assert!(prompt.contains("Acme's board of directors"));
        assert!(prompt.contains("'boardMembers' equal to null"));
    }

    #[tokio::test]
    async fn sends_system_and_page_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"boardMembers": [{"name": "Jane Doe", "bio": null, "link": null}]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let board = client(&server)
            .get_board_members_from_text("Board: Jane Doe (Chair)", "Acme")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board[0].name, "Jane Doe");

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], OPENAI_MODEL);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], build_board_prompt("Acme"));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Board: Jane Doe (Chair)");
    }

    #[tokio::test]
    async fn no_board_in_text_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(r#"{"boardMembers": null}"#)),
            )
            .mount(&server)
            .await;

        let board = client(&server)
            .get_board_members_from_text("Our cafeteria menu for this week.", "Acme")
            .await
            .unwrap();

        assert_eq!(board, None);
    }

    #[tokio::test]
    async fn malformed_reply_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sorry, I can't")))
            .mount(&server)
            .await;

        let result = client(&server)
            .get_board_members_from_text("Board: Jane Doe", "Acme")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn page_text_is_truncated_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(r#"{"boardMembers": null}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = "Jane Doe serves as chair of the board. ".repeat(200);
        client_with_budget(&server, 40, 10)
            .get_board_members_from_text(&text, "Acme")
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let sent = body["messages"][1]["content"].as_str().unwrap();

        let counter = TextTruncator::for_model(OPENAI_MODEL, 40, 10).unwrap();
        assert!(!sent.is_empty());
        assert!(sent.len() < text.len());
        assert!(text.starts_with(sent));
        assert!(counter.count_tokens(sent) <= 30);
    }
}
