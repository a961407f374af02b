use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogKind {
    #[serde(rename = "signup")]
    SignUp,
    #[serde(rename = "signin")]
    SignIn,
    Profile,
    Notification,
    OrderConfirmation,
    TrackOrder,
}

impl DialogKind {
    pub const ALL: [Self; 6] = [
        Self::SignUp,
        Self::SignIn,
        Self::Profile,
        Self::Notification,
        Self::OrderConfirmation,
        Self::TrackOrder,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "signup",
            Self::SignIn => "signin",
            Self::Profile => "profile",
            Self::Notification => "notification",
            Self::OrderConfirmation => "order-confirmation",
            Self::TrackOrder => "track-order",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

/// Open flags for the always-mounted dialogs.
///
/// Flags are independent: opening one dialog never closes another. Chained
/// flows either swap synchronously or queue a follow-up that opens once the
/// closing dialog reports its exit transition finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    pub signup: bool,
    pub signin: bool,
    pub profile: bool,
    pub notification: bool,
    pub order_confirmation: bool,
    pub track_order: bool,
    pending_follow_up: Option<PendingFollowUp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFollowUp {
    after: DialogKind,
    open: DialogKind,
}

impl DialogState {
    #[must_use]
    pub fn is_open(&self, kind: DialogKind) -> bool {
        match kind {
            DialogKind::SignUp => self.signup,
            DialogKind::SignIn => self.signin,
            DialogKind::Profile => self.profile,
            DialogKind::Notification => self.notification,
            DialogKind::OrderConfirmation => self.order_confirmation,
            DialogKind::TrackOrder => self.track_order,
        }
    }

    pub fn open(&mut self, kind: DialogKind) {
        self.set_open(kind, true);
    }

    /// The `onOpenChange` callback a dialog uses to close itself.
    pub fn set_open(&mut self, kind: DialogKind, open: bool) {
        let flag = match kind {
            DialogKind::SignUp => &mut self.signup,
            DialogKind::SignIn => &mut self.signin,
            DialogKind::Profile => &mut self.profile,
            DialogKind::Notification => &mut self.notification,
            DialogKind::OrderConfirmation => &mut self.order_confirmation,
            DialogKind::TrackOrder => &mut self.track_order,
        };
        *flag = open;
    }

    #[must_use]
    pub fn open_dialogs(&self) -> Vec<DialogKind> {
        DialogKind::ALL
            .into_iter()
            .filter(|kind| self.is_open(*kind))
            .collect()
    }

    /// Closes `from` and opens `to` in one step (signup <-> signin).
    pub fn swap(&mut self, from: DialogKind, to: DialogKind) {
        self.set_open(from, false);
        self.set_open(to, true);
    }

    /// Closes `after` and opens `next` once `after` reports it has closed.
    ///
    /// When `after` is already closed there is no exit transition left to
    /// wait for, so `next` opens immediately and nothing is queued.
    pub fn chain(&mut self, after: DialogKind, next: DialogKind) {
        if !self.is_open(after) {
            self.pending_follow_up = None;
            self.open(next);
            return;
        }
        self.set_open(after, false);
        self.pending_follow_up = Some(PendingFollowUp { after, open: next });
    }

    /// Called from the dialog's exit-transition completion. Returns the
    /// dialog opened as a follow-up, if any.
    pub fn on_closed(&mut self, kind: DialogKind) -> Option<DialogKind> {
        let pending = self.pending_follow_up?;
        if pending.after != kind || self.is_open(kind) {
            return None;
        }
        self.pending_follow_up = None;
        self.open(pending.open);
        Some(pending.open)
    }

    #[must_use]
    pub fn pending_follow_up(&self) -> Option<DialogKind> {
        self.pending_follow_up.map(|pending| pending.open)
    }

    pub fn cancel_follow_up(&mut self) {
        self.pending_follow_up = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        for kind in DialogKind::ALL {
            assert_eq!(DialogKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(DialogKind::from_name(" SignIn "), Some(DialogKind::SignIn));
        assert_eq!(DialogKind::from_name("checkout"), None);
    }

    #[test]
    fn flags_start_closed() {
        let dialogs = DialogState::default();
        assert!(dialogs.open_dialogs().is_empty());
    }

    #[test]
    fn opening_one_dialog_leaves_others_alone() {
        let mut dialogs = DialogState::default();
        dialogs.open(DialogKind::Profile);
        dialogs.open(DialogKind::Notification);
        assert_eq!(
            dialogs.open_dialogs(),
            vec![DialogKind::Profile, DialogKind::Notification]
        );

        dialogs.set_open(DialogKind::Profile, false);
        assert_eq!(dialogs.open_dialogs(), vec![DialogKind::Notification]);
    }

    #[test]
    fn swap_moves_between_signup_and_signin() {
        let mut dialogs = DialogState::default();
        dialogs.open(DialogKind::SignUp);
        dialogs.swap(DialogKind::SignUp, DialogKind::SignIn);
        assert!(!dialogs.signup);
        assert!(dialogs.signin);
    }

    #[test]
    fn chained_dialog_waits_for_close_completion() {
        let mut dialogs = DialogState::default();
        dialogs.open(DialogKind::OrderConfirmation);
        dialogs.chain(DialogKind::OrderConfirmation, DialogKind::TrackOrder);

        assert!(!dialogs.order_confirmation);
        assert!(!dialogs.track_order);
        assert_eq!(dialogs.pending_follow_up(), Some(DialogKind::TrackOrder));

        assert_eq!(dialogs.on_closed(DialogKind::Profile), None);
        assert_eq!(
            dialogs.on_closed(DialogKind::OrderConfirmation),
            Some(DialogKind::TrackOrder)
        );
        assert!(dialogs.track_order);
        assert_eq!(dialogs.pending_follow_up(), None);
        assert_eq!(dialogs.on_closed(DialogKind::OrderConfirmation), None);
    }

    #[test]
    fn reopened_dialog_does_not_fire_follow_up() {
        let mut dialogs = DialogState::default();
        dialogs.open(DialogKind::OrderConfirmation);
        dialogs.chain(DialogKind::OrderConfirmation, DialogKind::TrackOrder);
        dialogs.open(DialogKind::OrderConfirmation);
        assert_eq!(dialogs.on_closed(DialogKind::OrderConfirmation), None);
        assert_eq!(dialogs.pending_follow_up(), Some(DialogKind::TrackOrder));

        dialogs.cancel_follow_up();
        dialogs.set_open(DialogKind::OrderConfirmation, false);
        assert_eq!(dialogs.on_closed(DialogKind::OrderConfirmation), None);
        assert!(!dialogs.track_order);
    }

    #[test]
    fn chaining_from_a_closed_dialog_opens_next_immediately() {
        let mut dialogs = DialogState::default();
        dialogs.chain(DialogKind::OrderConfirmation, DialogKind::TrackOrder);

        assert!(dialogs.track_order);
        assert_eq!(dialogs.pending_follow_up(), None);

        dialogs.set_open(DialogKind::TrackOrder, false);
        dialogs.open(DialogKind::OrderConfirmation);
        dialogs.set_open(DialogKind::OrderConfirmation, false);
        assert_eq!(dialogs.on_closed(DialogKind::OrderConfirmation), None);
        assert!(!dialogs.track_order);
    }
}
