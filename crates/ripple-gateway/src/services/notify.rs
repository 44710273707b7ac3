use std::sync::Arc;

use serde_json::Value;

use ripple_core::protocol::event::{
    CommentCountUpdate, EventResponseUpdated, FollowAction, FollowRequest, FollowRequestAccepted,
    FollowUpdate, GroupAdminDecision, GroupChange, GroupEventChange, GroupEventDeleted, GroupInvitation,
    GroupMemberChange, GroupMemberRemoved, GroupMemberRoleUpdated, GroupMessage, GroupPostCreated,
    MessagesRead, PostCommented, PostCreated, PostLiked, PrivateMessage, StatsType, UserStatsUpdated,
    UserTyping,
};
use ripple_core::protocol::{Envelope, Event};

use crate::clock::unix_now;
use crate::realtime::{DeliveryReport, Hub};

/// Basic profile of the user an event is about.
#[derive(Debug, Clone)]
pub struct Actor<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub avatar: &'a str,
}

/// Typed producer helpers for the social domain.
///
/// Callers pass data they already loaded (names, member lists); nothing here
/// touches storage. Every helper is fire-and-forget: an event that cannot be
/// encoded is logged and skipped.
#[derive(Clone)]
pub struct Notifier {
    hub: Arc<Hub>,
}

impl Notifier {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    // ---- posts: everyone sees feed activity

    pub fn post_created(&self, post: Value, author: &Actor<'_>) -> DeliveryReport {
        self.to_all(Event::PostCreated(PostCreated {
            post,
            user_id: author.id.to_string(),
            user_name: author.name.to_string(),
        }))
    }

    pub fn post_liked(&self, post_id: i64, liker: &Actor<'_>, is_liked: bool, likes_count: i64) -> DeliveryReport {
        self.to_all(Event::PostLiked(PostLiked {
            post_id,
            user_id: liker.id.to_string(),
            user_name: liker.name.to_string(),
            is_liked,
            likes_count,
        }))
    }

    pub fn post_commented(&self, post_id: i64, comment: Value, author: &Actor<'_>, comment_count: i64) -> DeliveryReport {
        let mut report = self.to_all(Event::PostCommented(PostCommented {
            post_id,
            comment,
            user_id: author.id.to_string(),
            user_name: author.name.to_string(),
        }));
        let counts = self.to_all(Event::CommentCountUpdate(CommentCountUpdate {
            post_id,
            count: comment_count,
        }));
        report += counts;
        report
    }

    // ---- follows: only the users involved

    /// Tell `following_id` that `follower` followed or unfollowed them.
    pub fn follow_update(&self, follower: &Actor<'_>, following_id: &str, action: FollowAction) -> DeliveryReport {
        self.to_user(
            following_id,
            Event::FollowUpdate(FollowUpdate {
                follower_id: follower.id.to_string(),
                follower_name: follower.name.to_string(),
                avatar: follower.avatar.to_string(),
                action,
                timestamp: unix_now().to_string(),
            }),
        )
    }

    /// Tell `following_id` that `follower` asked to follow their private profile.
    pub fn follow_request(&self, follower: &Actor<'_>, following_id: &str) -> DeliveryReport {
        self.to_user(
            following_id,
            Event::FollowRequest(FollowRequest {
                follower_id: follower.id.to_string(),
                follower_name: follower.name.to_string(),
                avatar: follower.avatar.to_string(),
                timestamp: unix_now().to_string(),
            }),
        )
    }

    /// Tell `follower_id` that `following` accepted their request.
    pub fn follow_request_accepted(&self, follower_id: &str, following: &Actor<'_>) -> DeliveryReport {
        self.to_user(
            follower_id,
            Event::FollowRequestAccepted(FollowRequestAccepted {
                following_id: following.id.to_string(),
                following_name: following.name.to_string(),
                avatar: following.avatar.to_string(),
                timestamp: unix_now().to_string(),
            }),
        )
    }

    /// Push fresh follower/following counters to both sides of a follow edge.
    pub fn follow_counts(
        &self,
        follower_id: &str,
        following_id: &str,
        followers_count: i64,
        following_count: i64,
    ) -> DeliveryReport {
        let mut report = self.to_user(
            following_id,
            Event::UserStatsUpdated(UserStatsUpdated {
                user_id: following_id.to_string(),
                stats_type: StatsType::FollowersCount,
                count: followers_count,
            }),
        );
        let other = self.to_user(
            follower_id,
            Event::UserStatsUpdated(UserStatsUpdated {
                user_id: follower_id.to_string(),
                stats_type: StatsType::FollowingCount,
                count: following_count,
            }),
        );
        report += other;
        report
    }

    // ---- groups: fan out to the member list the caller loaded

    pub fn group_created(&self, group: Value, creator_id: &str) -> DeliveryReport {
        self.to_user(
            creator_id,
            Event::GroupCreated(GroupChange {
                group,
                user_id: creator_id.to_string(),
            }),
        )
    }

    pub fn group_updated<S: AsRef<str>>(&self, group: Value, editor_id: &str, members: &[S]) -> DeliveryReport {
        self.to_users(
            members,
            Event::GroupUpdated(GroupChange {
                group,
                user_id: editor_id.to_string(),
            }),
        )
    }

    pub fn group_deleted<S: AsRef<str>>(&self, group: Value, owner_id: &str, members: &[S]) -> DeliveryReport {
        self.to_users(
            members,
            Event::GroupDeleted(GroupChange {
                group,
                user_id: owner_id.to_string(),
            }),
        )
    }

    pub fn group_invitation(&self, group: Value, inviter: Value, invitee_id: &str) -> DeliveryReport {
        self.to_user(invitee_id, Event::GroupInvitation(GroupInvitation { group, inviter }))
    }

    pub fn group_event_created<S: AsRef<str>>(&self, event: Value, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::GroupEventCreated(GroupEventChange { event }))
    }

    pub fn group_event_updated<S: AsRef<str>>(&self, event: Value, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::GroupEventUpdated(GroupEventChange { event }))
    }

    pub fn group_event_deleted<S: AsRef<str>>(&self, event_id: &str, group_id: &str, members: &[S]) -> DeliveryReport {
        self.to_users(
            members,
            Event::GroupEventDeleted(GroupEventDeleted {
                event_id: event_id.to_string(),
                group_id: group_id.to_string(),
            }),
        )
    }

    pub fn event_response_updated<S: AsRef<str>>(&self, update: EventResponseUpdated, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::EventResponseUpdated(update))
    }

    // ---- group membership: members, admins, or the one user affected

    /// `user` accepted an invitation; every member hears about it.
    pub fn group_invitation_accepted<S: AsRef<str>>(&self, group: Value, user: Value, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::GroupInvitationAccepted(GroupMemberChange { group, user }))
    }

    /// `user` turned down an invitation; only the inviter hears about it.
    pub fn group_invitation_rejected(&self, group: Value, user: Value, inviter_id: &str) -> DeliveryReport {
        self.to_user(inviter_id, Event::GroupInvitationRejected(GroupMemberChange { group, user }))
    }

    /// `user` asked to join; goes to the group's admins only.
    pub fn group_join_request<S: AsRef<str>>(&self, group: Value, user: Value, admins: &[S]) -> DeliveryReport {
        self.to_users(admins, Event::GroupJoinRequest(GroupMemberChange { group, user }))
    }

    /// Tells `user_id` they were let in and the other members that they joined.
    pub fn group_join_request_accepted<S: AsRef<str>>(
        &self,
        group: Value,
        user_id: &str,
        user: Value,
        admin: Value,
        members: &[S],
    ) -> DeliveryReport {
        let mut report = self.to_user(
            user_id,
            Event::GroupJoinRequestAccepted(GroupAdminDecision {
                group: group.clone(),
                admin,
            }),
        );
        report += self.to_users_except(members, user_id, Event::NewGroupMember(GroupMemberChange { group, user }));
        report
    }

    pub fn group_join_request_rejected(&self, group: Value, admin: Value, user_id: &str) -> DeliveryReport {
        self.to_user(user_id, Event::GroupJoinRequestRejected(GroupAdminDecision { group, admin }))
    }

    pub fn group_member_left<S: AsRef<str>>(&self, group: Value, user: Value, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::GroupMemberLeft(GroupMemberChange { group, user }))
    }

    pub fn group_member_role_updated<S: AsRef<str>>(
        &self,
        group: Value,
        user: Value,
        role: &str,
        admin: Value,
        members: &[S],
    ) -> DeliveryReport {
        self.to_users(
            members,
            Event::GroupMemberRoleUpdated(GroupMemberRoleUpdated {
                group,
                user,
                role: role.to_string(),
                admin,
            }),
        )
    }

    /// Tells `user_id` they were removed and the remaining members who was removed.
    pub fn group_member_removed<S: AsRef<str>>(
        &self,
        group: Value,
        user_id: &str,
        user: Value,
        admin: Value,
        members: &[S],
    ) -> DeliveryReport {
        let mut report = self.to_user(
            user_id,
            Event::RemovedFromGroup(GroupAdminDecision {
                group: group.clone(),
                admin: admin.clone(),
            }),
        );
        report += self.to_users(members, Event::GroupMemberRemoved(GroupMemberRemoved { group, user, admin }));
        report
    }

    pub fn group_post_created<S: AsRef<str>>(&self, post: Value, members: &[S]) -> DeliveryReport {
        self.to_users(members, Event::GroupPostCreated(GroupPostCreated { post }))
    }

    /// Group chat line for every member but its author.
    pub fn group_message<S: AsRef<str>>(&self, message: GroupMessage, members: &[S]) -> DeliveryReport {
        let author = message.user.id.clone();
        self.to_users_except(members, &author, Event::GroupMessage(message))
    }

    // ---- direct messages: the two people in the conversation

    /// New message; the sender gets it too so their other tabs stay in sync.
    pub fn private_message(&self, message: PrivateMessage) -> DeliveryReport {
        let targets = [message.receiver_id.clone(), message.sender_id.clone()];
        self.to_users(&targets, Event::PrivateMessage(message))
    }

    /// `receiver_id` read what `sender_id` sent; both sides update their read marks.
    pub fn messages_read(&self, sender_id: &str, receiver_id: &str, read_at: &str) -> DeliveryReport {
        self.to_users(
            &[sender_id, receiver_id],
            Event::MessagesRead(MessagesRead {
                sender_id: sender_id.to_string(),
                receiver_id: receiver_id.to_string(),
                read_at: read_at.to_string(),
            }),
        )
    }

    pub fn user_typing(&self, sender_id: &str, receiver_id: &str) -> DeliveryReport {
        self.to_user(
            receiver_id,
            Event::UserTyping(UserTyping {
                sender_id: sender_id.to_string(),
                receiver_id: receiver_id.to_string(),
                timestamp: unix_now().to_string(),
            }),
        )
    }

    fn to_user(&self, user: &str, ev: Event) -> DeliveryReport {
        match self.envelope(&ev) {
            Some(env) => self.hub.deliver_to_user(user, &env),
            None => DeliveryReport::default(),
        }
    }

    fn to_users<S: AsRef<str>>(&self, users: &[S], ev: Event) -> DeliveryReport {
        match self.envelope(&ev) {
            Some(env) => self.hub.deliver_to_users(users, &env),
            None => DeliveryReport::default(),
        }
    }

    fn to_users_except<S: AsRef<str>>(&self, users: &[S], skip: &str, ev: Event) -> DeliveryReport {
        let targets: Vec<&str> = users.iter().map(|u| u.as_ref()).filter(|u| *u != skip).collect();
        self.to_users(&targets, ev)
    }

    fn to_all(&self, ev: Event) -> DeliveryReport {
        match self.envelope(&ev) {
            Some(env) => self.hub.deliver_to_all(&env),
            None => DeliveryReport::default(),
        }
    }

    fn envelope(&self, ev: &Event) -> Option<Envelope> {
        match Envelope::try_from(ev) {
            Ok(env) => Some(env),
            Err(e) => {
                tracing::warn!(kind = ev.kind(), error = %e, "event dropped: encode failed");
                None
            }
        }
    }
}
