use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::{debug, info};

use super::music_manager::{PlaybackManager, PlayerSettings};
use super::notifier::Notifier;
use super::voice::VoiceTransport;

/// Builds the manager for a guild. Tests swap this out to count or inspect
/// created managers.
pub type ManagerFactory = Arc<dyn Fn(GuildId) -> PlaybackManager + Send + Sync>;

/// Owns the playback manager of every guild. At most one live manager exists
/// per guild; a manager that shut down is replaced on the next lookup.
pub struct GuildRegistry {
    managers: DashMap<GuildId, Arc<PlaybackManager>>,
    factory: ManagerFactory,
}

impl GuildRegistry {
    pub fn new(
        transport: Arc<dyn VoiceTransport>,
        notifier: Arc<dyn Notifier>,
        settings: PlayerSettings,
    ) -> Self {
        Self::with_factory(Arc::new(move |guild_id| {
            PlaybackManager::new(
                guild_id,
                Arc::clone(&transport),
                Arc::clone(&notifier),
                settings,
            )
        }))
    }

    pub fn with_factory(factory: ManagerFactory) -> Self {
        Self {
            managers: DashMap::new(),
            factory,
        }
    }

    /// The live manager for `guild_id`, creating one if there is none.
    ///
    /// A dead entry is shut down completely (its loop joined and voice released)
    /// before a replacement is created.
    pub async fn get_or_create(&self, guild_id: GuildId) -> Arc<PlaybackManager> {
        loop {
            let stale = match self.managers.entry(guild_id) {
                Entry::Occupied(entry) if entry.get().is_alive() => {
                    return Arc::clone(entry.get());
                }
                Entry::Occupied(entry) => Arc::clone(entry.get()),
                Entry::Vacant(entry) => {
                    debug!("Creating player for guild {}", guild_id);
                    let manager = Arc::new((self.factory)(guild_id));
                    entry.insert(Arc::clone(&manager));
                    return manager;
                }
            };

            info!("Replacing expired player for guild {}", guild_id);
            stale.shutdown().await;
            self.managers
                .remove_if(&guild_id, |_, current| Arc::ptr_eq(current, &stale));
        }
    }

    /// The live manager for `guild_id`, if any. Never creates one.
    pub fn get(&self, guild_id: GuildId) -> Option<Arc<PlaybackManager>> {
        self.managers
            .get(&guild_id)
            .filter(|entry| entry.is_alive())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Shut the guild's manager down and evict it. Returns false when the guild
    /// had no live manager; an expired entry is still evicted.
    pub async fn remove(&self, guild_id: GuildId) -> bool {
        let Some(manager) = self
            .managers
            .get(&guild_id)
            .map(|entry| Arc::clone(entry.value()))
        else {
            return false;
        };

        let was_alive = manager.is_alive();
        manager.shutdown().await;
        self.managers
            .remove_if(&guild_id, |_, current| Arc::ptr_eq(current, &manager));
        info!("Removed player for guild {}", guild_id);
        was_alive
    }

    /// Number of guilds with a registered manager, live or not.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
