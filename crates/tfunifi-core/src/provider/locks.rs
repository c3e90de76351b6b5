// ── Settings locks ──
//
// Some controller settings are singletons shared by every resource that
// touches them (the USG settings object, the RADIUS profile). Writes to one
// of them are serialized through these locks. Each provider instance owns
// its own set, so two providers never block each other.

use tokio::sync::{Mutex, MutexGuard, TryLockError};

/// Singleton settings objects that need serialized writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKind {
    Usg,
    Radius,
}

#[derive(Debug, Default)]
pub struct SettingsLocks {
    usg: Mutex<()>,
    radius: Mutex<()>,
}

impl SettingsLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutex(&self, kind: SettingsKind) -> &Mutex<()> {
        match kind {
            SettingsKind::Usg => &self.usg,
            SettingsKind::Radius => &self.radius,
        }
    }

    /// Wait for exclusive access to `kind`; released when the guard drops.
    pub async fn lock(&self, kind: SettingsKind) -> MutexGuard<'_, ()> {
        self.mutex(kind).lock().await
    }

    pub fn try_lock(&self, kind: SettingsKind) -> Result<MutexGuard<'_, ()>, TryLockError> {
        self.mutex(kind).try_lock()
    }
}
