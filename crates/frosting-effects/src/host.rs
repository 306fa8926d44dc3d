//! Host environment services consumed by the scheduler.

/// Handle to a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle to a viewport resize subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeSubscription(pub u64);

/// Frame-callback service.
///
/// A requested frame is delivered back to the scheduler through
/// [`Animator::on_frame`](crate::Animator::on_frame) at the host's refresh cadence.
pub trait FrameClock {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Viewport resize notification service.
pub trait Viewport {
    fn subscribe_resize(&mut self) -> ResizeSubscription;
    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription);
}

/// Host that queues frame requests until the caller drains them.
///
/// Used by the terminal loop (drained once per tick) and by tests as a
/// manual stepper.
#[derive(Debug, Default)]
pub struct QueuedHost {
    next_frame: u64,
    next_subscription: u64,
    queued: Vec<FrameHandle>,
    subscriptions: Vec<ResizeSubscription>,
}

impl QueuedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame requested since the last call.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queued)
    }

    /// Number of frame requests waiting to be delivered.
    pub fn pending_frames(&self) -> usize {
        self.queued.len()
    }

    /// Number of live resize subscriptions.
    pub fn resize_subscribers(&self) -> usize {
        self.subscriptions.len()
    }
}

impl FrameClock for QueuedHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queued.retain(|h| *h != handle);
    }
}

impl Viewport for QueuedHost {
    fn subscribe_resize(&mut self) -> ResizeSubscription {
        self.next_subscription += 1;
        let subscription = ResizeSubscription(self.next_subscription);
        self.subscriptions.push(subscription);
        subscription
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        self.subscriptions.retain(|s| *s != subscription);
    }
}
