use std::sync::Arc;

use domain::{ChatMessage, DomainError, GroupId};
use uuid::Uuid;

use crate::{
    broadcaster::{MessageBroadcast, MessageBroadcaster},
    clock::Clock,
    dto::ChatMessageDto,
    error::ApplicationError,
    repository::FamilyGroupRepository,
};

#[derive(Debug, Clone)]
pub struct SendChatMessageRequest {
    pub group_id: Uuid,
    pub author_name: String,
    pub avatar: String,
    pub text: String,
}

pub struct ChatServiceDependencies {
    pub group_repository: Arc<dyn FamilyGroupRepository>,
    pub clock: Arc<dyn Clock>,
    pub broadcaster: Arc<dyn MessageBroadcaster>,
}

/// Store-facing half of the realtime hub: reads a group's message log and
/// appends new messages, handing persisted messages to the broadcaster.
pub struct ChatService {
    deps: ChatServiceDependencies,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies) -> Self {
        Self { deps }
    }

    /// Full message log in stored order for one group.
    pub async fn load_messages(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<ChatMessageDto>, ApplicationError> {
        let messages = self
            .deps
            .group_repository
            .list_messages(GroupId::from(group_id))
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        Ok(messages.iter().map(ChatMessageDto::from).collect())
    }

    /// Assigns the server-side timestamp, appends atomically, and only
    /// after successful persistence hands the message to the broadcaster.
    pub async fn send_message(
        &self,
        request: SendChatMessageRequest,
    ) -> Result<ChatMessageDto, ApplicationError> {
        let group_id = GroupId::from(request.group_id);
        let message = ChatMessage::new(
            request.author_name,
            request.avatar,
            request.text,
            self.deps.clock.now(),
        );

        let appended = self
            .deps
            .group_repository
            .append_message(group_id, message)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        self.deps
            .broadcaster
            .broadcast(MessageBroadcast {
                group_id,
                message: appended.clone(),
            })
            .await?;

        Ok(ChatMessageDto::from(&appended))
    }
}
