//! The service thread.
//!
//! One distinguished OS thread per VM performs operations that must run in native/blocking
//! context (printing, time, blocking I/O not integrated with the cooperative loop). A calling
//! green thread parks by sending a [`ServiceRequest`] and blocking on the matching
//! [`ServiceReply`]; the service thread has exclusive write access to the request/reply channel
//! between request and completion.

use crossbeam::channel::{self, Receiver, Sender};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A blocking operation only the service thread may perform, named the way `ServiceOperation`
/// globals are in.
#[derive(Debug, Clone)]
pub enum ServiceOperation {
    PrintString(String),
    CurrentTimeMillis,
    Sleep(Duration),
}

#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub thread_id: u32,
    pub op: ServiceOperation,
}

#[derive(Debug, Clone)]
pub enum ServiceReply {
    Done,
    TimeMillis(u64),
}

/// Handle the scheduler holds to park a green thread's blocking request with the service thread
/// and collect its reply later.
pub struct ServiceThreadHandle {
    requests: Sender<ServiceRequest>,
    replies: Receiver<(u32, ServiceReply)>,
    _worker: std::thread::JoinHandle<()>,
}

impl ServiceThreadHandle {
    /// Spawns the one OS thread that services blocking operations for the whole VM instance; no
    /// user code ever runs on it.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = channel::unbounded::<ServiceRequest>();
        let (reply_tx, reply_rx) = channel::unbounded::<(u32, ServiceReply)>();

        let worker = std::thread::spawn(move || {
            for request in request_rx {
                let reply = match request.op {
                    ServiceOperation::PrintString(s) => {
                        print!("{s}");
                        ServiceReply::Done
                    }
                    ServiceOperation::CurrentTimeMillis => {
                        let millis = SystemTime::now()
                            .duration_since(UNIX_EPOCH)
                            .unwrap_or_default()
                            .as_millis() as u64;
                        ServiceReply::TimeMillis(millis)
                    }
                    ServiceOperation::Sleep(duration) => {
                        std::thread::sleep(duration);
                        ServiceReply::Done
                    }
                };
                if reply_tx.send((request.thread_id, reply)).is_err() {
                    break;
                }
            }
        });

        ServiceThreadHandle {
            requests: request_tx,
            replies: reply_rx,
            _worker: worker,
        }
    }

    /// Parks `thread_id`'s request with the service thread. The calling green thread should
    /// transition to `ThreadState::Blocked` and the scheduler should poll [`Self::try_recv`] at
    /// its next safe point.
    pub fn submit(&self, thread_id: u32, op: ServiceOperation) {
        let _ = self.requests.send(ServiceRequest { thread_id, op });
    }

    /// Non-blocking poll for a completed request, returning the thread id to wake and its
    /// reply.
    pub fn try_recv(&self) -> Option<(u32, ServiceReply)> {
        self.replies.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_time_millis_round_trips_through_the_service_thread() {
        let handle = ServiceThreadHandle::spawn();
        handle.submit(1, ServiceOperation::CurrentTimeMillis);
        let (thread_id, reply) = loop {
            if let Some(received) = handle.try_recv() {
                break received;
            }
            std::thread::yield_now();
        };
        assert_eq!(thread_id, 1);
        assert!(matches!(reply, ServiceReply::TimeMillis(_)));
    }
}
