use std::collections::VecDeque;
use std::time::Duration;

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Slide-in / slide-out animation length
const TOAST_SLIDE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn color(&self) -> [f32; 4] {
        match self {
            ToastKind::Info => [0.23, 0.51, 0.96, 0.95],
            ToastKind::Success => [0.06, 0.73, 0.51, 0.95],
            ToastKind::Error => [0.94, 0.27, 0.27, 0.95],
        }
    }
}

/// A transient notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    age: Duration,
}

impl Toast {
    /// 0.0 = fully off screen, 1.0 = fully slid in
    pub fn slide(&self) -> f32 {
        let slide = TOAST_SLIDE.as_secs_f32();
        let age = self.age.as_secs_f32();
        let left = TOAST_LIFETIME.as_secs_f32() - age;
        (age / slide).min(left / slide).clamp(0.0, 1.0)
    }
}

/// Queue of toasts, auto-dismissed after [`TOAST_LIFETIME`]
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.push_back(Toast { message: message.into(), kind, age: Duration::ZERO });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, ToastKind::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, ToastKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, ToastKind::Error);
    }

    /// Age all toasts and drop the expired ones
    pub fn update(&mut self, dt: Duration) {
        for toast in &mut self.toasts {
            toast.age += dt;
        }
        self.toasts.retain(|t| t.age < TOAST_LIFETIME);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }
}
