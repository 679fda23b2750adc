//! String interning for property names.
//!
//! Every property name that reaches a shape is interned exactly once per
//! [`Interner`]. Two `InternedString`s compare equal only if they are the same
//! interned entry, so equality is a pointer comparison and never needs a deep
//! string compare.
//!
//! Each entry carries a precomputed 32-bit hash and a sequence id assigned at
//! interning time. The hash is what transition arrays sort by; the text is only
//! consulted when two distinct names collide on their hash.

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

/// Hash function used to compute a name's 32-bit hash.
pub type NameHashFn = fn(&str) -> u32;

// =============================================================================
// Interned String
// =============================================================================

struct Entry {
    text: Arc<str>,
    hash: u32,
    id: u32,
}

/// A canonical, interned property name.
///
/// Cloning is an `Arc` bump. Equality and hashing use identity, never the text.
#[derive(Clone)]
pub struct InternedString(Arc<Entry>);

impl InternedString {
    /// Get the string contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    /// Get the precomputed name hash.
    #[inline]
    pub fn hash_value(&self) -> u32 {
        self.0.hash
    }

    /// Get the sequence id assigned by the owning interner.
    #[inline]
    pub fn id(&self) -> u32 {
        self.0.id
    }

    /// Check whether two names are the same interned entry.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the interned entry.
    ///
    /// Only meaningful for ordering names that come from different interners.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for InternedString {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for InternedString {}

impl Hash for InternedString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.as_str(), self.id())
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Interner
// =============================================================================

/// Default name hash: FxHash of the UTF-8 bytes, folded to 32 bits.
pub fn default_name_hash(text: &str) -> u32 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    let full = hasher.finish();
    (full ^ (full >> 32)) as u32
}

/// Table of interned names.
///
/// Thread-safe; interning takes a short `parking_lot` lock.
pub struct Interner {
    table: Mutex<FxHashMap<Arc<str>, InternedString>>,
    next_id: AtomicU32,
    hash_fn: NameHashFn,
}

impl Interner {
    /// Create an interner using [`default_name_hash`].
    pub fn new() -> Self {
        Self::with_hash_fn(default_name_hash)
    }

    /// Create an interner with a custom hash function.
    ///
    /// A degenerate function (for example one returning a constant) forces
    /// every pair of names to collide, which is how collision ordering is
    /// exercised.
    pub fn with_hash_fn(hash_fn: NameHashFn) -> Self {
        Self {
            table: Mutex::new(FxHashMap::default()),
            next_id: AtomicU32::new(0),
            hash_fn,
        }
    }

    /// Intern `text`, returning the canonical name for it.
    pub fn intern(&self, text: &str) -> InternedString {
        let mut table = self.table.lock();
        if let Some(existing) = table.get(text) {
            return existing.clone();
        }

        let text: Arc<str> = Arc::from(text);
        let name = InternedString(Arc::new(Entry {
            text: Arc::clone(&text),
            hash: (self.hash_fn)(&text),
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        }));
        table.insert(text, name.clone());
        name
    }

    /// Look up an already-interned name without creating one.
    pub fn get(&self, text: &str) -> Option<InternedString> {
        self.table.lock().get(text).cloned()
    }

    /// Number of distinct names interned.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Check if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

// =============================================================================
// Global Interner
// =============================================================================

static GLOBAL_INTERNER: OnceLock<Interner> = OnceLock::new();

/// Get the process-wide interner.
#[inline]
pub fn global_interner() -> &'static Interner {
    GLOBAL_INTERNER.get_or_init(Interner::new)
}

/// Intern `text` in the process-wide interner.
#[inline]
pub fn intern(text: &str) -> InternedString {
    global_interner().intern(text)
}
