//! Channel type definitions and parsing.

use std::fmt;

use uuid::Uuid;

use wasil_entity::user::UserRole;

/// Typed channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Requests owned by a customer.
    Customer(Uuid),
    /// Requests assigned to a dispatcher.
    Dispatcher(Uuid),
    /// Every request.
    AdminRequests,
    /// Mailbox entries of one user.
    Mailbox(Uuid),
}

impl Channel {
    /// Parses a channel string into a typed channel.
    pub fn parse(channel: &str) -> Option<Self> {
        let parts: Vec<&str> = channel.splitn(2, ':').collect();
        match parts.as_slice() {
            ["customer", id] => Uuid::parse_str(id).ok().map(Channel::Customer),
            ["dispatcher", id] => Uuid::parse_str(id).ok().map(Channel::Dispatcher),
            ["mailbox", id] => Uuid::parse_str(id).ok().map(Channel::Mailbox),
            ["admin", "requests"] => Some(Channel::AdminRequests),
            _ => None,
        }
    }

    /// Whether a user with `role` may listen on this channel.
    pub fn is_visible_to(&self, user_id: Uuid, role: UserRole) -> bool {
        if role.is_admin() {
            return true;
        }
        match self {
            Channel::Customer(id) => *id == user_id && role == UserRole::Customer,
            Channel::Dispatcher(id) => *id == user_id && role == UserRole::Dispatcher,
            Channel::Mailbox(id) => *id == user_id,
            Channel::AdminRequests => false,
        }
    }

    /// Channels a fresh connection joins without asking.
    pub fn defaults_for(user_id: Uuid, role: UserRole) -> Vec<Channel> {
        let mut channels = vec![Channel::Mailbox(user_id)];
        match role {
            UserRole::Customer => channels.push(Channel::Customer(user_id)),
            UserRole::Dispatcher => channels.push(Channel::Dispatcher(user_id)),
            UserRole::Admin => channels.push(Channel::AdminRequests),
        }
        channels
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Customer(id) => write!(f, "customer:{id}"),
            Channel::Dispatcher(id) => write!(f, "dispatcher:{id}"),
            Channel::Mailbox(id) => write!(f, "mailbox:{id}"),
            Channel::AdminRequests => f.write_str("admin:requests"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let id = Uuid::new_v4();
        for channel in [
            Channel::Customer(id),
            Channel::Dispatcher(id),
            Channel::Mailbox(id),
            Channel::AdminRequests,
        ] {
            assert_eq!(Channel::parse(&channel.to_string()), Some(channel));
        }
        assert_eq!(Channel::parse("folder:abc"), None);
        assert_eq!(Channel::parse("customer:not-a-uuid"), None);
    }

    #[test]
    fn test_visibility() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(Channel::Customer(me).is_visible_to(me, UserRole::Customer));
        assert!(!Channel::Customer(other).is_visible_to(me, UserRole::Customer));
        assert!(!Channel::Dispatcher(me).is_visible_to(me, UserRole::Customer));
        assert!(!Channel::AdminRequests.is_visible_to(me, UserRole::Dispatcher));
        assert!(Channel::Customer(other).is_visible_to(me, UserRole::Admin));
    }
}
