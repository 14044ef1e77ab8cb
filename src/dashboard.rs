//! Dashboard composition
//!
//! Mounts every widget against one store and one [`TaskScope`]. Widgets never
//! talk to each other; the dashboard only gives them a shared lifecycle:
//!
//! - [`Dashboard::mount`] hydrates every widget
//! - [`Dashboard::teardown`] stops all deferred work
//! - [`Dashboard::clear_all`] wipes the store and resets every widget
//!
//! Plain widgets sit behind a `Mutex` and are reached through accessor
//! guards. Keep guards short-lived and never hold one across an `.await`.

use crate::scheduler::TaskScope;
use crate::storage::KeyValueStore;
use crate::widgets::chat::{ChatService, UserDirectory};
use crate::widgets::clone::CloneBoard;
use crate::widgets::email::{EmailComposer, EmailReceipt};
use crate::widgets::employees::{EmployeeManager, SimulationTiming};
use crate::widgets::mood::MoodTracker;
use crate::widgets::movies::MovieFavorites;
use crate::widgets::networth::NetWorthTracker;
use crate::widgets::photos::PhotoGallery;
use crate::widgets::preferences::PreferenceStore;
use crate::widgets::shopping::ShoppingList;
use crate::widgets::sms::SmsGateway;
use crate::widgets::sms_api::{SmsInbox, SmsProvider, ThreadMessage};
use crate::widgets::{lock, Widget, WidgetError, WidgetResult};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Timing knobs for the simulated widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    pub employee_timing: SimulationTiming,
    pub clone_delay: Duration,
    pub email_delay: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            employee_timing: SimulationTiming::default(),
            clone_delay: Duration::from_millis(2000),
            email_delay: Duration::from_millis(2000),
        }
    }
}

pub struct Dashboard {
    store: Arc<dyn KeyValueStore>,
    scope: TaskScope,
    directory: UserDirectory,
    chat: Mutex<ChatService>,
    photos: Mutex<PhotoGallery>,
    shopping: Mutex<ShoppingList>,
    mood: Mutex<MoodTracker>,
    networth: Mutex<NetWorthTracker>,
    movies: Mutex<MovieFavorites>,
    sms: Mutex<SmsGateway>,
    sms_inbox: Mutex<SmsInbox>,
    preferences: Mutex<PreferenceStore>,
    employees: EmployeeManager,
    clone_board: CloneBoard,
    email: EmailComposer,
    sms_provider: Option<Arc<dyn SmsProvider>>,
}

impl Dashboard {
    /// Hydrate every widget from `store`
    ///
    /// Must be called from within a tokio runtime: interrupted employee tasks
    /// are rescheduled on mount.
    pub fn mount(store: Arc<dyn KeyValueStore>, settings: DashboardSettings) -> Self {
        let scope = TaskScope::new();

        let dashboard = Self {
            directory: UserDirectory::default(),
            chat: Mutex::new(ChatService::mount(Arc::clone(&store))),
            photos: Mutex::new(PhotoGallery::mount(Arc::clone(&store))),
            shopping: Mutex::new(ShoppingList::mount(Arc::clone(&store))),
            mood: Mutex::new(MoodTracker::mount(Arc::clone(&store))),
            networth: Mutex::new(NetWorthTracker::mount(Arc::clone(&store))),
            movies: Mutex::new(MovieFavorites::mount(Arc::clone(&store))),
            sms: Mutex::new(SmsGateway::mount(Arc::clone(&store))),
            sms_inbox: Mutex::new(SmsInbox::mount(Arc::clone(&store))),
            preferences: Mutex::new(PreferenceStore::mount(Arc::clone(&store))),
            employees: EmployeeManager::mount(
                Arc::clone(&store),
                scope.clone(),
                settings.employee_timing,
            ),
            clone_board: CloneBoard::new(scope.clone(), settings.clone_delay),
            email: EmailComposer::new(settings.email_delay),
            sms_provider: None,
            store,
            scope,
        };

        tracing::info!("Dashboard mounted");
        dashboard
    }

    /// Attach the provider used by [`Dashboard::send_sms`]
    pub fn with_sms_provider(mut self, provider: Arc<dyn SmsProvider>) -> Self {
        tracing::info!(provider = provider.name(), "SMS provider configured");
        self.sms_provider = Some(provider);
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn chat(&self) -> MutexGuard<'_, ChatService> {
        lock(&self.chat)
    }

    pub fn photos(&self) -> MutexGuard<'_, PhotoGallery> {
        lock(&self.photos)
    }

    pub fn shopping(&self) -> MutexGuard<'_, ShoppingList> {
        lock(&self.shopping)
    }

    pub fn mood(&self) -> MutexGuard<'_, MoodTracker> {
        lock(&self.mood)
    }

    pub fn networth(&self) -> MutexGuard<'_, NetWorthTracker> {
        lock(&self.networth)
    }

    pub fn movies(&self) -> MutexGuard<'_, MovieFavorites> {
        lock(&self.movies)
    }

    pub fn sms(&self) -> MutexGuard<'_, SmsGateway> {
        lock(&self.sms)
    }

    pub fn sms_inbox(&self) -> MutexGuard<'_, SmsInbox> {
        lock(&self.sms_inbox)
    }

    pub fn preferences(&self) -> MutexGuard<'_, PreferenceStore> {
        lock(&self.preferences)
    }

    pub fn employees(&self) -> &EmployeeManager {
        &self.employees
    }

    pub fn clone_board(&self) -> &CloneBoard {
        &self.clone_board
    }

    pub fn has_sms_provider(&self) -> bool {
        self.sms_provider.is_some()
    }

    /// Send a real SMS and record it in the inbox
    pub async fn send_sms(&self, phone: &str, message: &str) -> WidgetResult<ThreadMessage> {
        let to = SmsInbox::prepare(phone, message)?;
        let provider = self.sms_provider.as_ref().ok_or_else(|| {
            WidgetError::Provider("SMS provider credentials are not configured".to_string())
        })?;

        let receipt = provider.send(&to, message).await?;
        tracing::info!(provider = provider.name(), sid = %receipt.sid, "SMS accepted");

        self.sms_inbox().record_outgoing(&to, message, &receipt)
    }

    pub async fn send_email(&self, address: &str, message: &str) -> WidgetResult<EmailReceipt> {
        self.email.send(address, message).await
    }

    /// Wipe the store and reset every widget to its empty state
    ///
    /// Every widget guard is taken before the wipe, so no handler can re-save
    /// old state between the wipe and the reset.
    pub fn clear_all(&self) -> WidgetResult<()> {
        let clear = || -> WidgetResult<()> {
            let mut chat = self.chat();
            let mut photos = self.photos();
            let mut shopping = self.shopping();
            let mut mood = self.mood();
            let mut networth = self.networth();
            let mut movies = self.movies();
            let mut sms = self.sms();
            let mut sms_inbox = self.sms_inbox();
            let mut preferences = self.preferences();

            self.store.clear()?;

            chat.reset();
            photos.reset();
            shopping.reset();
            mood.reset();
            networth.reset();
            movies.reset();
            sms.reset();
            sms_inbox.reset();
            preferences.reset();
            self.employees.clear();
            self.clone_board.clear();
            Ok(())
        };

        // Employee and clone state only change under the scope lock, so
        // holding it keeps deferred writes out as well
        let result = match self.scope.with(|_| clear()) {
            Some(result) => result,
            None => clear(),
        };

        if result.is_ok() {
            tracing::info!("All dashboard data cleared");
        }
        result
    }

    /// Stop all deferred work; nothing scheduled can run after this returns
    pub fn teardown(&self) {
        self.scope.teardown();
        tracing::info!("Dashboard torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.scope.is_closed()
    }
}
