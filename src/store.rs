//! The item store and its builder.

use crate::error::{Error, Result};
use crate::model::{Item, ItemFields};
use crate::persist::{ensure_file, read_data, write_data};
use crate::policy::{IdAllocator, IdPolicy};
use crate::serializer::JsonSerializer;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::info;

/// CRUD over a JSON file, mirrored to a second file after every change.
///
/// Every call reads the primary file fresh; nothing is cached between calls.
/// Mutations hold a single writer lock for the whole
/// read → modify → write → mirror sequence, so concurrent callers in one
/// process cannot lose each other's updates. Reads take no lock.
///
/// **Single-process only.** Two processes pointed at the same files will
/// clobber each other.
pub struct ItemStore {
    primary: PathBuf,
    mirror: PathBuf,
    serializer: JsonSerializer,
    writer: Mutex<IdAllocator>,
}

impl ItemStore {
    /// Open (or create) a store with pretty JSON and max-based ids.
    pub fn open(primary: impl AsRef<Path>, mirror: impl AsRef<Path>) -> Result<Self> {
        Self::builder(primary, mirror).build()
    }

    /// Start configuring a new store. Call [`.build()`](ItemStoreBuilder::build)
    /// when ready.
    pub fn builder(primary: impl AsRef<Path>, mirror: impl AsRef<Path>) -> ItemStoreBuilder {
        ItemStoreBuilder::new(primary, mirror)
    }

    // ---- reads ----

    /// Every item, in stored order.
    pub fn list(&self) -> Result<Vec<Item>> {
        self.load()
    }

    /// The item with `id`.
    pub fn get(&self, id: u64) -> Result<Item> {
        self.load()?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Path to the primary file.
    #[must_use]
    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    /// Path to the mirror file.
    #[must_use]
    pub fn mirror_path(&self) -> &Path {
        &self.mirror
    }

    /// How new ids are picked.
    #[must_use]
    pub fn id_policy(&self) -> IdPolicy {
        self.writer.lock().policy()
    }

    // ---- writes ----

    /// Validate `fields`, give them a fresh id and append the new item.
    pub fn create(&self, fields: ItemFields) -> Result<Item> {
        fields.validate()?;
        let mut ids = self.writer.lock();
        let mut items = self.load()?;
        let item = Item::from_fields(ids.next(&items)?, fields);
        items.push(item.clone());
        self.commit(&items)?;
        info!(id = item.id, "item created");
        Ok(item)
    }

    /// Replace the fields of item `id`, keeping its id and position.
    pub fn update(&self, id: u64, fields: ItemFields) -> Result<Item> {
        fields.validate()?;
        let _guard = self.writer.lock();
        let mut items = self.load()?;
        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(Error::NotFound(id))?;
        *slot = Item::from_fields(id, fields);
        let updated = slot.clone();
        self.commit(&items)?;
        info!(id, "item updated");
        Ok(updated)
    }

    /// Remove item `id`, returning it.
    pub fn delete(&self, id: u64) -> Result<Item> {
        let _guard = self.writer.lock();
        let mut items = self.load()?;
        let idx = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(Error::NotFound(id))?;
        let removed = items.remove(idx);
        self.commit(&items)?;
        info!(id, "item deleted");
        Ok(removed)
    }

    // ---- mirroring ----

    /// Copy the primary file's current contents over the mirror file.
    ///
    /// Runs after every successful mutation. Call it directly to repair a
    /// mirror left behind by a failed copy; it waits for any mutation in
    /// flight, so it never copies a stale primary over a newer mirror.
    pub fn sync_output(&self) -> Result<()> {
        let _guard = self.writer.lock();
        self.copy_to_mirror()
    }

    // ---- internal ----

    fn load(&self) -> Result<Vec<Item>> {
        read_data(&self.primary, &self.serializer)
    }

    // Caller holds the writer lock.
    fn commit(&self, items: &[Item]) -> Result<()> {
        write_data(&self.primary, items, &self.serializer)?;
        self.copy_to_mirror()
    }

    // Caller holds the writer lock.
    fn copy_to_mirror(&self) -> Result<()> {
        let items: Vec<Item> = read_data(&self.primary, &self.serializer)?;
        write_data(&self.mirror, &items, &self.serializer)
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("primary", &self.primary)
            .field("mirror", &self.mirror)
            .field("pretty", &self.serializer.is_pretty())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens an [`ItemStore`].
///
/// ```rust,no_run
/// use items_sync::{IdPolicy, ItemStore};
///
/// let store = ItemStore::builder("data.json", "parsed_output.json")
///     .pretty(false)
///     .id_policy(IdPolicy::Monotonic)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ItemStoreBuilder {
    primary: PathBuf,
    mirror: PathBuf,
    pretty: bool,
    id_policy: IdPolicy,
}

impl ItemStoreBuilder {
    fn new(primary: impl AsRef<Path>, mirror: impl AsRef<Path>) -> Self {
        Self {
            primary: primary.as_ref().to_path_buf(),
            mirror: mirror.as_ref().to_path_buf(),
            pretty: true,
            id_policy: IdPolicy::default(),
        }
    }

    /// Write indented JSON (default: `true`).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Set the id policy (default: [`IdPolicy::MaxPlusOne`]).
    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    /// Create missing files, check the primary file parses, and return the
    /// store.
    pub fn build(self) -> Result<ItemStore> {
        if self.primary == self.mirror {
            return Err(Error::Config(format!(
                "primary and mirror must be different files, both are {}",
                self.primary.display()
            )));
        }
        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::compact()
        };

        for path in [&self.primary, &self.mirror] {
            if ensure_file(path)? {
                info!(path = %path.display(), "initialised empty data file");
            }
        }
        let existing: Vec<Item> = read_data(&self.primary, &serializer)?;

        Ok(ItemStore {
            writer: Mutex::new(IdAllocator::new(self.id_policy, &existing)),
            primary: self.primary,
            mirror: self.mirror,
            serializer,
        })
    }
}
