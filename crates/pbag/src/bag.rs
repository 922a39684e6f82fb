//! the output property tree
//!
//! [PropertyTree] owns every bag a parse produced in one arena, and hands
//! out [PropertyBag] views into it. Bases are arena indices, not copies:
//! a bag consults its bases at lookup time, so a base always reflects its
//! current contents, and because the arena also holds the bags that never
//! joined the output tree (abstract templates), a base can never dangle.
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Index of one bag inside its [PropertyTree].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BagId(usize);

/// All property bags of one parsed document.
#[derive(Debug)]
pub struct PropertyTree {
    bags: Vec<BagData>,
}

#[derive(Debug)]
struct BagData {
    name: String,
    /// A leaf's text. Collections carry `None` and use `children`.
    value: Option<String>,
    children: IndexMap<String, BagId>,
    /// Consulted in order for names not found in `children`.
    bases: Vec<BagId>,
}

impl PropertyTree {
    /// A tree holding only the unnamed, valueless root.
    pub fn new() -> Self {
        Self {
            bags: vec![BagData {
                name: String::new(),
                value: None,
                children: IndexMap::new(),
                bases: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> PropertyBag<'_> {
        PropertyBag {
            tree: self,
            id: self.root_id(),
        }
    }

    pub(crate) fn root_id(&self) -> BagId {
        BagId(0)
    }

    pub(crate) fn alloc(
        &mut self,
        name: String,
        value: Option<String>,
        bases: Vec<BagId>,
    ) -> BagId {
        let id = BagId(self.bags.len());
        self.bags.push(BagData {
            name,
            value,
            children: IndexMap::new(),
            bases,
        });
        id
    }

    /// Insert `child` under `parent`, keyed by the child's name.
    pub(crate) fn add_child(&mut self, parent: BagId, child: BagId) {
        let name = self.bags[child.0].name.clone();
        self.bags[parent.0].children.insert(name, child);
    }

    pub(crate) fn child_count(&self, id: BagId) -> usize {
        self.bags[id.0].children.len()
    }

    /// Resolve `name` in `id`'s own children, then through its bases in
    /// declaration order, depth first. First match wins.
    pub(crate) fn lookup(&self, id: BagId, name: &str) -> Option<BagId> {
        let data = &self.bags[id.0];
        data.children.get(name).copied().or_else(|| {
            data.bases.iter().find_map(|base| self.lookup(*base, name))
        })
    }
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed view of one bag.
///
/// Cheap to copy; all lookups resolve through the bag's bases.
#[derive(Clone, Copy)]
pub struct PropertyBag<'a> {
    tree: &'a PropertyTree,
    id: BagId,
}

impl<'a> PropertyBag<'a> {
    fn data(&self) -> &'a BagData {
        &self.tree.bags[self.id.0]
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// The scalar text of a leaf, `None` for collections.
    pub fn value(&self) -> Option<&'a str> {
        self.data().value.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tree.lookup(self.id, name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<PropertyBag<'a>> {
        let id = self.tree.lookup(self.id, name)?;
        Some(PropertyBag {
            tree: self.tree,
            id,
        })
    }

    /// Own children in insertion order; inherited names are not iterated.
    pub fn children(self) -> impl Iterator<Item = PropertyBag<'a>> + 'a {
        self.data().children.values().map(move |id| PropertyBag {
            tree: self.tree,
            id: *id,
        })
    }

    /// Number of own children.
    pub fn len(&self) -> usize {
        self.data().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().children.is_empty()
    }
}

impl std::fmt::Debug for PropertyBag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("PropertyBag");
        debug.field("name", &self.name());
        match self.value() {
            Some(value) => debug.field("value", &value),
            None => debug.field("children", &self.len()),
        };
        debug.finish()
    }
}

/// Leaves serialize as their text, collections as a map of their own
/// children in insertion order. A read-only inspection view; inherited
/// names are not expanded into it.
impl Serialize for PropertyBag<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value() {
            Some(value) => serializer.serialize_str(value),
            None => {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for child in self.children() {
                    map.serialize_entry(child.name(), &child)?;
                }
                map.end()
            }
        }
    }
}
