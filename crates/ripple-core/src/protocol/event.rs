//! Typed events emitted by domain services.
//!
//! Serde's adjacent tagging maps each variant onto the `{"type","payload"}`
//! envelope directly. Payload keys are camelCase because the front-end reads
//! them that way. Opaque domain records (a post, a group, a group event) are
//! carried as `serde_json::Value` since their schema belongs to the producer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every event kind the hub delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    PostCreated(PostCreated),
    PostLiked(PostLiked),
    PostCommented(PostCommented),
    CommentCountUpdate(CommentCountUpdate),
    UserStatsUpdated(UserStatsUpdated),
    FollowUpdate(FollowUpdate),
    FollowRequest(FollowRequest),
    FollowRequestAccepted(FollowRequestAccepted),
    UserStatusUpdate(UserStatusUpdate),
    GroupCreated(GroupChange),
    GroupUpdated(GroupChange),
    GroupDeleted(GroupChange),
    GroupInvitation(GroupInvitation),
    GroupEventCreated(GroupEventChange),
    GroupEventUpdated(GroupEventChange),
    GroupEventDeleted(GroupEventDeleted),
    EventResponseUpdated(EventResponseUpdated),
    PrivateMessage(PrivateMessage),
    MessagesRead(MessagesRead),
    UserTyping(UserTyping),
    GroupInvitationAccepted(GroupMemberChange),
    GroupInvitationRejected(GroupMemberChange),
    GroupJoinRequest(GroupMemberChange),
    GroupJoinRequestAccepted(GroupAdminDecision),
    GroupJoinRequestRejected(GroupAdminDecision),
    NewGroupMember(GroupMemberChange),
    GroupMemberLeft(GroupMemberChange),
    GroupMemberRoleUpdated(GroupMemberRoleUpdated),
    RemovedFromGroup(GroupAdminDecision),
    GroupMemberRemoved(GroupMemberRemoved),
    GroupPostCreated(GroupPostCreated),
    GroupMessage(GroupMessage),
}

impl Event {
    /// Wire discriminator of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PostCreated(_) => "post_created",
            Event::PostLiked(_) => "post_liked",
            Event::PostCommented(_) => "post_commented",
            Event::CommentCountUpdate(_) => "comment_count_update",
            Event::UserStatsUpdated(_) => "user_stats_updated",
            Event::FollowUpdate(_) => "follow_update",
            Event::FollowRequest(_) => "follow_request",
            Event::FollowRequestAccepted(_) => "follow_request_accepted",
            Event::UserStatusUpdate(_) => "user_status_update",
            Event::GroupCreated(_) => "group_created",
            Event::GroupUpdated(_) => "group_updated",
            Event::GroupDeleted(_) => "group_deleted",
            Event::GroupInvitation(_) => "group_invitation",
            Event::GroupEventCreated(_) => "group_event_created",
            Event::GroupEventUpdated(_) => "group_event_updated",
            Event::GroupEventDeleted(_) => "group_event_deleted",
            Event::EventResponseUpdated(_) => "event_response_updated",
            Event::PrivateMessage(_) => "private_message",
            Event::MessagesRead(_) => "messages_read",
            Event::UserTyping(_) => "user_typing",
            Event::GroupInvitationAccepted(_) => "group_invitation_accepted",
            Event::GroupInvitationRejected(_) => "group_invitation_rejected",
            Event::GroupJoinRequest(_) => "group_join_request",
            Event::GroupJoinRequestAccepted(_) => "group_join_request_accepted",
            Event::GroupJoinRequestRejected(_) => "group_join_request_rejected",
            Event::NewGroupMember(_) => "new_group_member",
            Event::GroupMemberLeft(_) => "group_member_left",
            Event::GroupMemberRoleUpdated(_) => "group_member_role_updated",
            Event::RemovedFromGroup(_) => "removed_from_group",
            Event::GroupMemberRemoved(_) => "group_member_removed",
            Event::GroupPostCreated(_) => "group_post_created",
            Event::GroupMessage(_) => "group_message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreated {
    pub post: Value,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLiked {
    pub post_id: i64,
    pub user_id: String,
    pub user_name: String,
    pub is_liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommented {
    pub post_id: i64,
    pub comment: Value,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCountUpdate {
    pub post_id: i64,
    pub count: i64,
}

/// Which counter a [`UserStatsUpdated`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsType {
    FollowersCount,
    FollowingCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsUpdated {
    pub user_id: String,
    pub stats_type: StatsType,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Followed,
    Unfollowed,
}

/// Sent to the user being followed or unfollowed.
///
/// Field names keep the `ID` suffix and the string timestamp the clients
/// already consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpdate {
    #[serde(rename = "followerID")]
    pub follower_id: String,
    #[serde(rename = "followerName")]
    pub follower_name: String,
    pub avatar: String,
    pub action: FollowAction,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowRequest {
    #[serde(rename = "followerID")]
    pub follower_id: String,
    #[serde(rename = "followerName")]
    pub follower_name: String,
    pub avatar: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowRequestAccepted {
    #[serde(rename = "followingID")]
    pub following_id: String,
    #[serde(rename = "followingName")]
    pub following_name: String,
    pub avatar: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub user_id: String,
    pub is_online: bool,
    /// Unix seconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupChange {
    pub group: Value,
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInvitation {
    pub group: Value,
    pub inviter: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEventChange {
    pub event: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEventDeleted {
    pub event_id: String,
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseUpdated {
    pub event_id: String,
    pub group_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub response_type: String,
    pub going_count: i64,
    pub not_going_count: i64,
}

// ---- direct messages

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateMessage {
    pub message_id: i64,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    /// RFC 3339.
    pub created_at: String,
    pub is_read: bool,
    pub sender_name: String,
    pub sender_avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesRead {
    pub sender_id: String,
    pub receiver_id: String,
    /// RFC 3339.
    pub read_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTyping {
    pub sender_id: String,
    pub receiver_id: String,
    /// Unix seconds, as a string.
    pub timestamp: String,
}

// ---- group membership

/// A member joined, left, asked to join, or answered an invitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMemberChange {
    pub group: Value,
    pub user: Value,
}

/// An admin accepted, rejected, or removed someone. Sent to that user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAdminDecision {
    pub group: Value,
    pub admin: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMemberRoleUpdated {
    pub group: Value,
    pub user: Value,
    pub role: String,
    pub admin: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMemberRemoved {
    pub group: Value,
    pub user: Value,
    pub admin: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPostCreated {
    pub post: Value,
}

/// Group chat line. Keys keep the casing the group chat client reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMessage {
    pub id: i64,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "User")]
    pub user: GroupMessageAuthor,
    /// RFC 3339.
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "GroupID")]
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessageAuthor {
    pub id: String,
    pub first_name: String,
    pub avatar: String,
}
