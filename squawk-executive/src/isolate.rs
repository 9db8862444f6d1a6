//! Isolate model.
//!
//! An independently startable, hibernatable user process running inside a VM instance. Owns its
//! own per-class static areas and channel contexts; shares code (klasses, method bodies) via
//! the suite it was started from.

use indexmap::IndexMap;
use squawk_core::{ClassId, Oop};

/// One class's static storage: an isolate owns a private instance of this for every class it
/// has initialized, even when the class itself is shared bootstrap code.
#[derive(Debug, Clone, Default)]
pub struct StaticArea {
    pub ints: Vec<i32>,
    pub longs: Vec<i64>,
    pub oops: Vec<Option<Oop>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HibernationState {
    Running,
    Hibernating,
    Hibernated,
}

pub struct Isolate {
    pub id: u32,
    pub classpath_url: String,
    pub main_class: String,
    pub argv: Vec<String>,
    pub parent_suite_url: Option<String>,
    pub static_areas: IndexMap<ClassId, StaticArea>,
    pub owned_thread_ids: Vec<u32>,
    pub hibernation: HibernationState,
}

impl Isolate {
    pub fn new(id: u32, classpath_url: String, main_class: String, argv: Vec<String>) -> Self {
        Isolate {
            id,
            classpath_url,
            main_class,
            argv,
            parent_suite_url: None,
            static_areas: IndexMap::new(),
            owned_thread_ids: Vec::new(),
            hibernation: HibernationState::Running,
        }
    }

    /// Returns this class's static area, creating an empty one on first reference.
    pub fn static_area_mut(&mut self, class: ClassId) -> &mut StaticArea {
        self.static_areas.entry(class).or_default()
    }

    pub fn add_thread(&mut self, thread_id: u32) {
        self.owned_thread_ids.push(thread_id);
    }

    pub fn remove_thread(&mut self, thread_id: u32) {
        self.owned_thread_ids.retain(|&id| id != thread_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_area_created_lazily_on_first_reference() {
        let mut isolate = Isolate::new(1, "file:///app".into(), "Main".into(), vec![]);
        assert!(isolate.static_areas.is_empty());
        let area = isolate.static_area_mut(ClassId::new(0, 1));
        area.ints.push(42);
        assert_eq!(isolate.static_areas.len(), 1);
        assert_eq!(isolate.static_areas[&ClassId::new(0, 1)].ints, vec![42]);
    }

    #[test]
    fn owned_threads_track_additions_and_removals() {
        let mut isolate = Isolate::new(1, "file:///app".into(), "Main".into(), vec![]);
        isolate.add_thread(10);
        isolate.add_thread(11);
        isolate.remove_thread(10);
        assert_eq!(isolate.owned_thread_ids, vec![11]);
    }
}
