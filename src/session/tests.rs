use super::*;
use crate::draw::RED;
use crate::input::SurfacePoint;
use crate::test_support::{corrupt_file, png_file};

/// Runs every decode request synchronously and applies it.
fn settle(session: &mut Session, request: Option<DecodeRequest>) -> Option<DecodeStatus> {
    request.map(|request| session.apply_decode(request.run()))
}

fn paint(session: &mut Session, y: f64) {
    assert!(session.push_history().unwrap());
    let mask = session.active_mut().unwrap().mask_mut();
    mask.draw_segment(SurfacePoint::new(1.0, y), SurfacePoint::new(14.0, y), 3.0, RED)
        .unwrap();
}

fn mask_snapshot(session: &mut Session) -> crate::draw::SurfaceSnapshot {
    session.active_mut().unwrap().mask_mut().snapshot().unwrap()
}

fn names(session: &Session) -> Vec<&str> {
    session.entries().iter().map(|e| e.name()).collect()
}

#[test]
fn first_batch_selects_index_zero_and_requests_decode() {
    let mut session = Session::default();
    assert_eq!(session.current_index(), None);

    let request = session
        .load_images([png_file("a.png", 4, 3), png_file("b.png", 4, 3)])
        .expect("decode requested");
    assert_eq!(request.index, 0);
    assert_eq!(session.current_index(), Some(0));
    assert!(session.is_awaiting_decode());

    let status = settle(&mut session, Some(request)).unwrap();
    assert!(matches!(
        status,
        DecodeStatus::Applied {
            index: 0,
            width: 4,
            height: 3
        }
    ));
    assert_eq!(session.entry(0).unwrap().dimensions(), Some((4, 3)));
    assert!(session.has_active_surface());
}

#[test]
fn batches_are_appended_in_order() {
    let mut session = Session::default();
    let request = session.load_images([png_file("1.png", 2, 2), png_file("2.png", 2, 2)]);
    settle(&mut session, request);
    let request = session.navigate(1);
    settle(&mut session, request);

    let request = session.load_images([
        png_file("3.png", 2, 2),
        png_file("4.png", 2, 2),
        png_file("5.png", 2, 2),
    ]);
    assert!(request.is_none(), "appending must not change the current image");
    assert_eq!(session.len(), 5);
    assert_eq!(names(&session), ["1.png", "2.png", "3.png", "4.png", "5.png"]);
    assert_eq!(session.current_index(), Some(1));
    assert!(session.has_active_surface());
}

#[test]
fn duplicate_names_are_made_unique() {
    let mut session = Session::default();
    session.load_images([png_file("scan.png", 2, 2), png_file("scan.png", 2, 2)]);
    session.load_images([png_file("scan.png", 2, 2)]);
    assert_eq!(
        names(&session),
        ["scan.png", "scan (2).png", "scan (3).png"]
    );
}

#[test]
fn navigation_is_clamped() {
    let mut session = Session::default();
    assert!(session.navigate(1).is_none());

    let request = session.load_images([
        png_file("a.png", 2, 2),
        png_file("b.png", 2, 2),
        png_file("c.png", 2, 2),
    ]);
    settle(&mut session, request);

    assert!(session.navigate(-1).is_none());
    assert_eq!(session.current_index(), Some(0));

    let request = session.navigate(10).expect("moved to last image");
    assert_eq!(request.index, 2);
    settle(&mut session, Some(request));
    assert!(session.navigate(1).is_none());

    let request = session.set_current_index(99);
    assert!(request.is_none());
    assert_eq!(session.current_index(), Some(2));
}

#[test]
fn navigation_discards_active_surface_until_decode_completes() {
    let mut session = Session::default();
    let request = session.load_images([png_file("a.png", 6, 6), png_file("b.png", 8, 5)]);
    settle(&mut session, request);

    let request = session.set_current_index(1).unwrap();
    assert!(!session.has_active_surface());
    assert!(!session.push_history().unwrap());
    assert_eq!(session.save_mask().unwrap(), None);

    settle(&mut session, Some(request));
    let active = session.active().unwrap();
    assert_eq!(active.index(), 1);
    assert_eq!((active.mask().width(), active.mask().height()), (8, 5));
}

#[test]
fn stale_decode_does_not_overwrite_active_surface() {
    let mut session = Session::default();
    let first = session
        .load_images([
            png_file("a.png", 4, 4),
            png_file("b.png", 5, 5),
            png_file("c.png", 6, 6),
        ])
        .unwrap();
    let to_b = session.set_current_index(1).unwrap();
    let to_c = session.set_current_index(2).unwrap();

    // Completions arrive out of order relative to navigation.
    assert!(matches!(
        session.apply_decode(first.run()),
        DecodeStatus::Stale { index: 0 }
    ));
    assert!(matches!(
        session.apply_decode(to_c.run()),
        DecodeStatus::Applied { index: 2, .. }
    ));
    assert!(matches!(
        session.apply_decode(to_b.run()),
        DecodeStatus::Stale { index: 1 }
    ));

    let active = session.active().unwrap();
    assert_eq!(active.index(), 2);
    assert_eq!(active.mask().width(), 6);
}

#[test]
fn superseded_decode_for_same_index_is_stale() {
    let mut session = Session::default();
    let first = session
        .load_images([png_file("a.png", 4, 4), png_file("b.png", 4, 4)])
        .unwrap();
    let away = session.set_current_index(1).unwrap();
    let back = session.set_current_index(0).unwrap();

    assert!(matches!(
        session.apply_decode(first.run()),
        DecodeStatus::Stale { .. }
    ));
    drop(away);
    assert!(matches!(
        session.apply_decode(back.run()),
        DecodeStatus::Applied { index: 0, .. }
    ));
}

#[test]
fn decode_failure_is_reported_and_session_continues() {
    let mut session = Session::default();
    let request = session.load_images([corrupt_file("broken.png"), png_file("ok.png", 3, 3)]);

    let status = settle(&mut session, request).unwrap();
    match status {
        DecodeStatus::Failed { index, name, error } => {
            assert_eq!(index, 0);
            assert_eq!(name, "broken.png");
            assert!(matches!(error, DecodeError::Image { .. }));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!session.has_active_surface());
    assert_eq!(session.failures().len(), 1);
    assert_eq!(session.failures()[0].0, "broken.png");

    // Invalid operations on the failed image are silent no-ops.
    assert!(!session.undo().unwrap());
    assert!(!session.clear_mask().unwrap());
    assert_eq!(session.save_mask().unwrap(), None);

    let request = session.navigate(1);
    assert!(matches!(
        settle(&mut session, request),
        Some(DecodeStatus::Applied { index: 1, .. })
    ));
}

#[test]
fn revisiting_failed_image_retries_decode() {
    let mut session = Session::default();
    let request = session.load_images([corrupt_file("broken.png"), png_file("ok.png", 3, 3)]);
    settle(&mut session, request);
    assert!(matches!(
        session.entry(0).unwrap().state(),
        DecodeState::Failed(_)
    ));

    // Re-selecting the current failed image issues a fresh request.
    let retry = session.set_current_index(0).expect("retry requested");
    assert_eq!(session.entry(0).unwrap().state(), &DecodeState::Pending);
    drop(retry);
}

#[test]
fn save_mask_accumulates_distinct_snapshots() {
    let mut session = Session::default();
    let request = session.load_images([png_file("a.png", 16, 16)]);
    settle(&mut session, request);

    for y in [3.0, 8.0, 13.0] {
        paint(&mut session, y);
        session.save_mask().unwrap();
    }

    let saved = session.masks().get("a.png");
    assert_eq!(saved.len(), 3);
    assert_ne!(saved[0], saved[1]);
    assert_ne!(saved[1], saved[2]);
    assert_eq!(session.history().undo_depth(0), 3);
}

#[test]
fn undo_does_not_touch_saved_masks() {
    let mut session = Session::default();
    let request = session.load_images([png_file("a.png", 16, 16)]);
    settle(&mut session, request);

    paint(&mut session, 5.0);
    session.save_mask().unwrap();
    let saved = session.masks().get("a.png")[0].clone();

    assert!(session.undo().unwrap());
    assert!(mask_snapshot(&mut session).is_blank());
    assert_eq!(session.masks().count("a.png"), 1);
    assert_eq!(session.masks().get("a.png")[0], saved);
    assert_eq!(session.history().redo_depth(0), 1);
}

#[test]
fn clear_is_undoable() {
    let mut session = Session::default();
    let request = session.load_images([png_file("a.png", 16, 16)]);
    settle(&mut session, request);

    paint(&mut session, 5.0);
    let painted = mask_snapshot(&mut session);

    assert!(session.clear_mask().unwrap());
    assert!(mask_snapshot(&mut session).is_blank());
    assert!(session.undo().unwrap());
    assert_eq!(mask_snapshot(&mut session), painted);
}

#[test]
fn history_is_kept_per_index_across_navigation() {
    let mut session = Session::default();
    let request = session.load_images([
        png_file("a.png", 16, 16),
        png_file("b.png", 16, 16),
        png_file("c.png", 16, 16),
    ]);
    settle(&mut session, request);
    paint(&mut session, 4.0);
    paint(&mut session, 8.0);

    let request = session.set_current_index(2);
    settle(&mut session, request);
    paint(&mut session, 4.0);
    assert!(session.undo().unwrap());

    assert_eq!(session.history().undo_depth(0), 2);
    assert_eq!(session.history().redo_depth(0), 0);
    assert_eq!(session.history().undo_depth(1), 0);
    assert_eq!(session.history().undo_depth(2), 0);
    assert_eq!(session.history().redo_depth(2), 1);
}

#[test]
fn decoded_image_reports_dimensions() {
    let bytes = crate::test_support::png_bytes(7, 2);
    let decoded = decode_image("x.png", &bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (7, 2));
    assert!(matches!(
        decode_image("bad", b"nope"),
        Err(DecodeError::Image { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn decode_manager_delivers_completions() {
    let mut manager = DecodeManager::new(&tokio::runtime::Handle::current());
    let mut session = Session::default();
    let request = session
        .load_images([png_file("a.png", 5, 4)])
        .unwrap();

    manager.request(request).unwrap();
    let completion = manager.next().await.expect("completion delivered");
    assert!(matches!(
        session.apply_decode(completion),
        DecodeStatus::Applied {
            width: 5,
            height: 4,
            ..
        }
    ));
    assert!(manager.try_next().is_none());
}
