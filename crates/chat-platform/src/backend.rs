//! [`ChatBackend`] over the managed GraphQL engine.

use async_trait::async_trait;

use chat_core::ports::{ChatBackend, MessageStream};
use chat_types::{
    Result,
    chat::Chat,
    config::ClientConfig,
    envelope::SendMessageOutput,
};
use crate::graphql::{GraphqlClient, TokenProvider};
use crate::operations::*;
use crate::subscription::subscribe_snapshots;

pub struct HasuraBackend {
    graphql: GraphqlClient,
    ws_url: String,
    token: TokenProvider,
}

impl HasuraBackend {
    pub fn new(config: &ClientConfig, token: TokenProvider) -> Self {
        Self {
            graphql: GraphqlClient::new(config.graphql_url.clone(), token.clone()),
            ws_url: config.graphql_ws_url.clone(),
            token,
        }
    }
}

#[async_trait(?Send)]
impl ChatBackend for HasuraBackend {
    async fn list_chats(&self, owner_id: &str) -> Result<Vec<Chat>> {
        let data: ChatsData = self
            .graphql
            .execute(GET_CHATS, get_chats_vars(owner_id))
            .await?;
        Ok(data.chats)
    }

    async fn create_chat(&self, title: &str, owner_id: &str) -> Result<Chat> {
        let data: CreateChatData = self
            .graphql
            .execute(CREATE_CHAT, create_chat_vars(title, owner_id))
            .await?;
        log::info!("Created chat {}", data.insert_chats_one.id);
        Ok(data.insert_chats_one)
    }

    async fn send_message(&self, chat_id: &str, content: &str) -> Result<SendMessageOutput> {
        let data: SendMessageData = self
            .graphql
            .execute(SEND_MESSAGE, send_message_vars(chat_id, content))
            .await?;
        Ok(data.send_message)
    }

    fn subscribe_messages(&self, chat_id: &str) -> MessageStream {
        log::debug!("Subscribing to messages of chat {}", chat_id);
        subscribe_snapshots(
            &self.ws_url,
            (self.token)(),
            GET_MESSAGES,
            get_messages_vars(chat_id),
        )
    }
}
