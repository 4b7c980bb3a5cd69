//! Read-only view of guilds, members and channels as seen by the gateway.
//!
//! Handlers only consume these snapshots; fetching and caching belongs to the
//! gateway implementation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Other,
}

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub id: u64,
    pub name: String,
    pub kind: ChannelKind,
    pub topic: Option<String>,
    pub position: u16,
}

#[derive(Debug, Clone)]
pub struct RoleInfo {
    pub id: u64,
    pub name: String,
    pub position: u16,
}

#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    pub bot: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub user: UserInfo,
    pub nickname: Option<String>,
    pub game: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
    pub role_ids: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct GuildInfo {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub member_count: u64,
    pub roles: Vec<RoleInfo>,
    pub channels: Vec<ChannelInfo>,
}

impl GuildInfo {
    /// Roles other than @everyone, which shares the guild's id.
    pub fn assignable_roles(&self) -> impl Iterator<Item = &RoleInfo> {
        self.roles.iter().filter(move |r| r.id != self.id)
    }

    pub fn channel(&self, id: u64) -> Option<&ChannelInfo> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel_named(&self, name: &str) -> Option<&ChannelInfo> {
        self.channels
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn role_names(&self, ids: &[u64]) -> Vec<String> {
        let mut roles: Vec<&RoleInfo> = self
            .assignable_roles()
            .filter(|r| ids.contains(&r.id))
            .collect();
        roles.sort_by(|a, b| b.position.cmp(&a.position));
        roles.into_iter().map(|r| r.name.clone()).collect()
    }
}

/// Entity lookups the command handlers rely on.
pub trait Directory: Send + Sync {
    fn guild(&self, guild_id: u64) -> Option<GuildInfo>;

    fn member(&self, guild_id: u64, user_id: u64) -> Option<MemberInfo>;

    fn members(&self, guild_id: u64) -> Vec<MemberInfo>;

    fn user(&self, user_id: u64) -> Option<UserInfo>;

    /// Number of guilds, including `guild_id`'s, the user is a member of.
    fn mutual_guild_count(&self, user_id: u64) -> usize;

    /// Resolve a member by mention, raw id, or (case-insensitive) name.
    fn find_member(&self, guild_id: u64, query: &str) -> Option<MemberInfo> {
        if let Some(id) = crate::util::parse_user_mention(query) {
            return self.member(guild_id, id);
        }
        let query = query.trim();
        self.members(guild_id).into_iter().find(|m| {
            m.user.name.eq_ignore_ascii_case(query)
                || m.nickname
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(query))
        })
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// In-memory directory for handler tests.
    #[derive(Default)]
    pub struct StaticDirectory {
        pub guilds: HashMap<u64, GuildInfo>,
        pub members: HashMap<u64, Vec<MemberInfo>>,
    }

    impl Directory for StaticDirectory {
        fn guild(&self, guild_id: u64) -> Option<GuildInfo> {
            self.guilds.get(&guild_id).cloned()
        }

        fn member(&self, guild_id: u64, user_id: u64) -> Option<MemberInfo> {
            self.members
                .get(&guild_id)?
                .iter()
                .find(|m| m.user.id == user_id)
                .cloned()
        }

        fn members(&self, guild_id: u64) -> Vec<MemberInfo> {
            self.members.get(&guild_id).cloned().unwrap_or_default()
        }

        fn user(&self, user_id: u64) -> Option<UserInfo> {
            self.members
                .values()
                .flatten()
                .find(|m| m.user.id == user_id)
                .map(|m| m.user.clone())
        }

        fn mutual_guild_count(&self, user_id: u64) -> usize {
            self.members
                .values()
                .filter(|ms| ms.iter().any(|m| m.user.id == user_id))
                .count()
        }
    }

    pub const GUILD: u64 = 1000;
    pub const GENERAL: u64 = 2001;
    pub const LOUNGE: u64 = 2002;
    pub const VOICE: u64 = 2003;

    pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    pub fn member(id: u64, name: &str, game: Option<&str>) -> MemberInfo {
        MemberInfo {
            user: UserInfo {
                id,
                name: name.to_string(),
                bot: false,
                avatar_url: Some(format!("https://cdn.example/avatars/{id}.png")),
                created_at: date(2016, 1, 1),
            },
            nickname: None,
            game: game.map(str::to_string),
            joined_at: Some(date(2017, 6, 1)),
            role_ids: vec![GUILD],
        }
    }

    pub fn directory() -> StaticDirectory {
        let guild = GuildInfo {
            id: GUILD,
            name: "Touhou".to_string(),
            owner_id: 1,
            icon_url: Some("https://cdn.example/icons/1000.png".to_string()),
            created_at: date(2016, 3, 4),
            member_count: 3,
            roles: vec![
                RoleInfo {
                    id: GUILD,
                    name: "@everyone".to_string(),
                    position: 0,
                },
                RoleInfo {
                    id: 3001,
                    name: "Mod".to_string(),
                    position: 2,
                },
                RoleInfo {
                    id: 3002,
                    name: "Member".to_string(),
                    position: 1,
                },
            ],
            channels: vec![
                ChannelInfo {
                    id: LOUNGE,
                    name: "lounge".to_string(),
                    kind: ChannelKind::Text,
                    topic: Some("off topic".to_string()),
                    position: 1,
                },
                ChannelInfo {
                    id: GENERAL,
                    name: "general".to_string(),
                    kind: ChannelKind::Text,
                    topic: Some("welcome!".to_string()),
                    position: 0,
                },
                ChannelInfo {
                    id: VOICE,
                    name: "voice".to_string(),
                    kind: ChannelKind::Voice,
                    topic: None,
                    position: 0,
                },
            ],
        };

        let mut owner = member(1, "reimu", Some("Touhou Project"));
        owner.nickname = Some("shrine maiden".to_string());
        owner.role_ids = vec![GUILD, 3001, 3002];
        let mut other = member(2, "marisa", Some("touhou 6"));
        other.role_ids = vec![3002];
        let mut bot = member(3, "hourai", None);
        bot.user.bot = true;

        let mut dir = StaticDirectory::default();
        dir.guilds.insert(GUILD, guild);
        dir.members.insert(GUILD, vec![owner, other, bot]);
        dir.members.insert(9999, vec![member(1, "reimu", None)]);
        dir
    }
}
