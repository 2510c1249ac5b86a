// Lifecycle sequences driven the way the watcher drives them, counting the
// DOM actions that would be issued

use std::time::{Duration, Instant};

use vinpanel::panel::{INACTIVITY_TIMEOUT, UNKNOWN_GRACE};
use vinpanel::{PageContext, PanelAction, PanelController, PanelEvent, PanelPhase};

fn count_mounts(actions: &[PanelAction]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, PanelAction::Mount))
        .count()
}

#[test]
fn test_repeated_opens_never_stack_panels() {
    let start = Instant::now();
    let mut controller = PanelController::new(start);
    let mut mounts = 0;

    mounts += count_mounts(&controller.handle(PanelEvent::Boot, start));
    for i in 1..=5 {
        let now = start + Duration::from_secs(i);
        mounts += count_mounts(&controller.handle(PanelEvent::Open, now));
    }

    assert_eq!(mounts, 1);
    assert_eq!(controller.phase(), PanelPhase::Visible);
}

#[test]
fn test_every_mount_is_preceded_by_cleanup() {
    let start = Instant::now();
    let mut controller = PanelController::new(start);

    let boot = controller.handle(PanelEvent::Boot, start);
    let mount_at = boot
        .iter()
        .position(|a| matches!(a, PanelAction::Mount))
        .unwrap();
    let cleanup_at = boot
        .iter()
        .position(|a| matches!(a, PanelAction::CleanupDuplicates))
        .unwrap();
    assert!(cleanup_at < mount_at);

    // A purged panel remounts through the same path.
    let remount = controller.handle(PanelEvent::PanelMissing, start + Duration::from_secs(1));
    let mount_at = remount
        .iter()
        .position(|a| matches!(a, PanelAction::Mount))
        .unwrap();
    let cleanup_at = remount
        .iter()
        .position(|a| matches!(a, PanelAction::CleanupDuplicates))
        .unwrap();
    assert!(cleanup_at < mount_at);
}

#[test]
fn test_inactivity_collapse_and_recovery_cycle() {
    let start = Instant::now();
    let mut controller = PanelController::new(start);
    controller.handle(PanelEvent::Boot, start);
    controller.handle(
        PanelEvent::ContextChanged(PageContext::Dashboard),
        start,
    );

    // Quiet until past the timeout: one collapse, then nothing more.
    let late = start + INACTIVITY_TIMEOUT + Duration::from_secs(1);
    let actions = controller.handle(PanelEvent::Tick, late);
    assert!(actions.iter().any(|a| matches!(a, PanelAction::Collapse)));
    assert_eq!(controller.phase(), PanelPhase::Collapsed);
    assert!(controller.handle(PanelEvent::Tick, late + Duration::from_secs(60)).is_empty());

    // The user clicks the trigger; the panel comes back and the timer restarts.
    let resumed = late + Duration::from_secs(120);
    let actions = controller.handle(PanelEvent::Expand, resumed);
    assert!(actions.iter().any(|a| matches!(a, PanelAction::Expand)));
    assert_eq!(controller.phase(), PanelPhase::Visible);
    assert!(controller.handle(PanelEvent::Tick, resumed + Duration::from_secs(1)).is_empty());
}

#[test]
fn test_unknown_context_grace_is_shorter_than_inactivity() {
    assert!(UNKNOWN_GRACE < INACTIVITY_TIMEOUT);

    let start = Instant::now();
    let mut controller = PanelController::new(start);
    controller.handle(PanelEvent::Boot, start);
    controller.handle(
        PanelEvent::ContextChanged(PageContext::Unknown),
        start,
    );

    let past_grace = start + UNKNOWN_GRACE + Duration::from_secs(1);
    let actions = controller.handle(PanelEvent::Tick, past_grace);
    assert!(actions.iter().any(|a| matches!(a, PanelAction::Collapse)));
    assert_eq!(controller.phase(), PanelPhase::Collapsed);
}

#[test]
fn test_hover_pins_the_panel_open() {
    let start = Instant::now();
    let mut controller = PanelController::new(start);
    controller.handle(PanelEvent::Boot, start);
    controller.handle(
        PanelEvent::ContextChanged(PageContext::Dashboard),
        start,
    );
    controller.handle(PanelEvent::HoverChanged(true), start);

    let late = start + INACTIVITY_TIMEOUT * 3;
    assert!(controller.handle(PanelEvent::Tick, late).is_empty());
    assert_eq!(controller.phase(), PanelPhase::Visible);
}
