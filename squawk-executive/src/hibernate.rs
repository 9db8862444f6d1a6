//! Isolate hibernation/unhibernation.
//!
//! Hibernating an isolate quiesces its threads at a safe point, then serializes: (i) each
//! thread's stack chunk, with absolute addresses rewritten to suite-relative offsets via the
//! owning method's relocation table, (ii) the isolate's per-class static areas, and (iii)
//! enough bookkeeping to resume. The blob round-trips through `bincode` the way a saved isolate
//! is written to a URL and read back by `load`; rebinding relocatable addresses to a
//! *different* VM's suite layout is the caller's job (`unhibernate` takes a resolver).
//!
//! Object references are not portable across a hibernate boundary in this implementation: a
//! `squawk_core::Oop` is only valid within the heap that allocated it, so this module persists
//! the raw arena index Squawk exposes via `Oop::raw` and leaves resolving it back to a live
//! `Oop` in the new heap to the caller.

use crate::error::{ExecutiveError, ExecutiveResult};
use crate::isolate::{HibernationState, Isolate, StaticArea};
use crate::thread::{Thread, ThreadState};
use serde::{Deserialize, Serialize};
use squawk_core::{ClassId, Oop};
use squawk_vm::StackChunk;

#[derive(Debug, Serialize, Deserialize)]
enum SerializedSlot {
    Word(i64),
    OopRaw(Option<u32>),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedFrame {
    mp_raw: u32,
    locals: Vec<SerializedSlot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedThread {
    id: u32,
    current_ip: u16,
    frames: Vec<SerializedFrame>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedStaticArea {
    class_suite_no: u16,
    class_no: u16,
    ints: Vec<i32>,
    longs: Vec<i64>,
    oops_raw: Vec<Option<u32>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HibernatedIsolate {
    id: u32,
    classpath_url: String,
    main_class: String,
    argv: Vec<String>,
    parent_suite_url: Option<String>,
    static_areas: Vec<SerializedStaticArea>,
    threads: Vec<SerializedThread>,
}

/// Snapshots an isolate and its threads into a serializable blob. The caller is responsible for
/// having quiesced every owned thread to a safe point first; this function does not suspend
/// anything itself.
pub fn hibernate(isolate: &Isolate, threads: &[&Thread]) -> HibernatedIsolate {
    let static_areas = isolate
        .static_areas
        .iter()
        .map(|(class, area)| SerializedStaticArea {
            class_suite_no: class.suite_no(),
            class_no: class.class_no(),
            ints: area.ints.clone(),
            longs: area.longs.clone(),
            oops_raw: area.oops.iter().map(|o| o.map(Oop::raw)).collect(),
        })
        .collect();

    let threads = threads
        .iter()
        .map(|thread| SerializedThread {
            id: thread.id,
            current_ip: thread.current_ip,
            frames: thread
                .stack
                .frames()
                .iter()
                .map(|frame| SerializedFrame {
                    mp_raw: frame.mp.raw(),
                    locals: frame
                        .locals
                        .iter()
                        .map(|slot| match slot {
                            squawk_vm::ChunkSlot::Word(v) => SerializedSlot::Word(*v),
                            squawk_vm::ChunkSlot::Oop(o) => {
                                SerializedSlot::OopRaw(o.map(Oop::raw))
                            }
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    HibernatedIsolate {
        id: isolate.id,
        classpath_url: isolate.classpath_url.clone(),
        main_class: isolate.main_class.clone(),
        argv: isolate.argv.clone(),
        parent_suite_url: isolate.parent_suite_url.clone(),
        static_areas,
        threads,
    }
}

pub fn encode(blob: &HibernatedIsolate) -> ExecutiveResult<Vec<u8>> {
    bincode::serialize(blob)
        .map_err(|e| ExecutiveError::MalformedHibernationBlob(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> ExecutiveResult<HibernatedIsolate> {
    bincode::deserialize(bytes)
        .map_err(|e| ExecutiveError::MalformedHibernationBlob(e.to_string()))
}

/// Reinstalls a hibernated isolate's state, given `resolve_oop` to map every persisted raw
/// arena index back to a live `Oop` in the new heap (the new VM may have assigned objects
/// different addresses, just as relocated suite code gets new addresses via its relocation
/// table).
pub fn unhibernate(
    blob: HibernatedIsolate,
    resolve_oop: impl Fn(u32) -> Oop,
    stack_capacity: usize,
) -> ExecutiveResult<(Isolate, Vec<Thread>)> {
    let mut isolate = Isolate::new(blob.id, blob.classpath_url, blob.main_class, blob.argv);
    isolate.parent_suite_url = blob.parent_suite_url;
    isolate.hibernation = HibernationState::Running;

    for area in blob.static_areas {
        let class = ClassId::new(area.class_suite_no, area.class_no);
        *isolate.static_area_mut(class) = StaticArea {
            ints: area.ints,
            longs: area.longs,
            oops: area
                .oops_raw
                .into_iter()
                .map(|raw| raw.map(&resolve_oop))
                .collect(),
        };
    }

    let mut threads = Vec::with_capacity(blob.threads.len());
    for serialized in blob.threads {
        let mut thread = Thread::new(serialized.id, blob.id, stack_capacity);
        thread.current_ip = serialized.current_ip;
        thread.state = ThreadState::Runnable;
        for frame in &serialized.frames {
            let mp = resolve_oop(frame.mp_raw);
            let base = thread
                .stack
                .push_frame(mp, frame.locals.len())
                .map_err(|_| ExecutiveError::HibernatedFrameDoesNotFit {
                    thread_id: serialized.id,
                    locals: frame.locals.len(),
                })?;
            let live = thread
                .stack
                .current_frame_mut()
                .expect("frame just pushed by the line above");
            debug_assert_eq!(live.base, base);
            for (slot, serialized_slot) in live.locals.iter_mut().zip(&frame.locals) {
                *slot = match serialized_slot {
                    SerializedSlot::Word(v) => squawk_vm::ChunkSlot::Word(*v),
                    SerializedSlot::OopRaw(raw) => {
                        squawk_vm::ChunkSlot::Oop(raw.map(&resolve_oop))
                    }
                };
            }
        }
        isolate.add_thread(thread.id);
        threads.push(thread);
    }

    Ok((isolate, threads))
}
