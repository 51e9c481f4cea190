//! Cached navigation menus.
//!
//! One namespace holds four kinds of entries:
//!
//! | key          | value                          |
//! |--------------|--------------------------------|
//! | `ids`        | every menu id (an index)       |
//! | `locations`  | theme location name to menu id |
//! | `menu-{id}`  | the menu term                  |
//! | `items-{id}` | the menu items                 |

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::repos::{MenuRepo, RepoError};
use crate::cache::{
    CacheBackend, CacheConfig, CacheEvent, CachePolicy, CachedIndex, EventKind,
    LifecycleObserver, ReadThroughCache,
};
use crate::domain::entities::{MenuItem, MenuTerm};

pub const IDS_KEY: &str = "ids";
pub const LOCATIONS_KEY: &str = "locations";

pub fn menu_key(menu_id: u64) -> String {
    format!("menu-{menu_id}")
}

pub fn items_key(menu_id: u64) -> String {
    format!("items-{menu_id}")
}

/// What the caller asks to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuRequest {
    pub theme_location: Option<String>,
    /// Menu picked directly, used when no theme location is given.
    pub menu_id: Option<u64>,
    /// Whether the caller configured a fallback renderer.
    pub has_fallback: bool,
}

impl MenuRequest {
    pub fn for_location(theme_location: impl Into<String>) -> Self {
        Self {
            theme_location: Some(theme_location.into()),
            ..Self::default()
        }
    }

    pub fn for_menu(menu_id: u64) -> Self {
        Self {
            menu_id: Some(menu_id),
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    fn location(&self) -> Option<&str> {
        self.theme_location
            .as_deref()
            .filter(|location| !location.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResolution {
    /// Items are sorted by `menu_order`; items sharing an order keep
    /// their host order.
    Menu { menu: MenuTerm, items: Vec<MenuItem> },
    Fallback,
    Nothing,
}

pub struct MenuCache {
    repo: Arc<dyn MenuRepo>,
    ids: CachedIndex<u64>,
    locations: ReadThroughCache<BTreeMap<String, u64>>,
    menus: ReadThroughCache<Option<MenuTerm>>,
    items: ReadThroughCache<Vec<MenuItem>>,
}

impl MenuCache {
    pub fn new(config: CacheConfig, backend: Arc<dyn CacheBackend>, repo: Arc<dyn MenuRepo>) -> Self {
        let ids = ReadThroughCache::<Vec<u64>>::new(config, backend);
        let locations = ids.sibling();
        let menus = ids.sibling::<Option<MenuTerm>>().with_policy(
            CachePolicy::cache_all()
                .with_cacheable(Option::is_some)
                .with_hit(Option::is_some),
        );
        let items = ids
            .sibling::<Vec<MenuItem>>()
            .with_policy(CachePolicy::cache_all().with_cacheable(|items: &Vec<MenuItem>| {
                !items.is_empty()
            }));

        Self {
            repo,
            ids: CachedIndex::new(ids, IDS_KEY),
            locations,
            menus,
            items,
        }
    }

    pub fn menu_ids(&self) -> Result<Vec<u64>, RepoError> {
        self.ids.members(|| self.repo.menu_ids())
    }

    pub fn menu_locations(&self) -> Result<BTreeMap<String, u64>, RepoError> {
        self.locations
            .get(LOCATIONS_KEY, |_| self.repo.menu_locations())
    }

    /// The menu assigned to `theme_location`, if any.
    pub fn menu_object(&self, theme_location: &str) -> Result<Option<MenuTerm>, RepoError> {
        let locations = self.menu_locations()?;
        let Some(&menu_id) = locations.get(theme_location) else {
            debug!(theme_location, "No menu assigned to theme location");
            return Ok(None);
        };

        self.menu_by_id(menu_id)
    }

    pub fn menu_by_id(&self, menu_id: u64) -> Result<Option<MenuTerm>, RepoError> {
        self.menus
            .get(&menu_key(menu_id), |_| self.repo.menu_object(menu_id))
    }

    pub fn menu_items(&self, menu_id: u64) -> Result<Vec<MenuItem>, RepoError> {
        self.items
            .get(&items_key(menu_id), |_| self.repo.menu_items(menu_id))
    }

    pub fn add_menu(&self, menu_id: u64) -> Result<Vec<u64>, RepoError> {
        self.ids.add(menu_id, || self.repo.menu_ids())
    }

    /// Drop the entries of one menu, and the locations map which may point
    /// at it.
    pub fn delete_menu_cache(&self, menu_id: u64) {
        self.menus.invalidate(&menu_key(menu_id));
        self.items.invalidate(&items_key(menu_id));
        self.locations.invalidate(LOCATIONS_KEY);
    }

    pub fn delete_menu(&self, menu_id: u64) -> Result<Vec<u64>, RepoError> {
        let remaining = self.ids.remove(&menu_id, || self.repo.menu_ids())?;
        self.delete_menu_cache(menu_id);
        Ok(remaining)
    }

    /// Drop the entries of every indexed menu; returns how many menus were
    /// cleared.
    pub fn delete_all_menus_caches(&self) -> Result<usize, RepoError> {
        let menu_ids = self.menu_ids()?;
        for menu_id in &menu_ids {
            self.delete_menu_cache(*menu_id);
        }
        Ok(menu_ids.len())
    }

    /// Decide what to render for `request`.
    ///
    /// A configured fallback wins when no menu is assigned, and also when the
    /// menu has no items and the request named no theme location.
    ///
    /// Items with the same `menu_order` are all kept, in host order.
    pub fn resolve(&self, request: &MenuRequest) -> Result<MenuResolution, RepoError> {
        let menu = match (request.location(), request.menu_id) {
            (Some(location), _) => self.menu_object(location)?,
            (None, Some(menu_id)) => self.menu_by_id(menu_id)?,
            (None, None) => None,
        };

        let Some(menu) = menu else {
            return Ok(if request.has_fallback {
                MenuResolution::Fallback
            } else {
                MenuResolution::Nothing
            });
        };

        let mut items = self.menu_items(menu.term_id)?;
        if items.is_empty() && request.location().is_none() && request.has_fallback {
            return Ok(MenuResolution::Fallback);
        }

        items.sort_by_key(|item| item.menu_order);
        Ok(MenuResolution::Menu { menu, items })
    }

    fn apply(&self, kind: &EventKind) -> Result<(), RepoError> {
        match *kind {
            EventKind::MenuCreated { menu_id } => self.add_menu(menu_id).map(drop),
            EventKind::MenuUpdated { menu_id } => {
                self.delete_menu_cache(menu_id);
                Ok(())
            }
            EventKind::MenuDeleted { menu_id } => self.delete_menu(menu_id).map(drop),
            EventKind::PostSaved { .. } => self.delete_all_menus_caches().map(drop),
        }
    }
}

impl LifecycleObserver for MenuCache {
    fn name(&self) -> &'static str {
        "menu_cache"
    }

    fn on_event(&self, event: &CacheEvent) {
        if let Err(err) = self.apply(&event.kind) {
            warn!(
                observer = self.name(),
                event_id = %event.id,
                epoch = event.epoch,
                error = %err,
                result = "degraded",
                "Menu cache could not apply lifecycle event"
            );
        }
    }
}
