use std::{
    io::{Cursor, Read},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use super::{
    archive::{ExportSnapshot, build_archive},
    dependencies::{ArchiveSaver, ExportDependencies},
    file::ArchiveSaveConfig,
    manager::ExportManager,
    pipeline::{ExportRequest, perform_export},
    types::{ExportDestination, ExportError, ExportOutcome, ExportStatus},
};
use crate::draw::RED;
use crate::input::SurfacePoint;
use crate::session::Session;
use crate::test_support::{png_bytes, png_file};

#[derive(Clone)]
struct MockSaver {
    should_fail: bool,
    path: PathBuf,
    calls: Arc<Mutex<usize>>,
}

impl ArchiveSaver for MockSaver {
    fn save(&self, _archive_data: &[u8], _config: &ArchiveSaveConfig) -> Result<PathBuf, ExportError> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            Err(ExportError::Io(std::io::Error::other("disk full")))
        } else {
            Ok(self.path.clone())
        }
    }
}

fn mock_saver(should_fail: bool) -> MockSaver {
    MockSaver {
        should_fail,
        path: PathBuf::from("/tmp/masks_by_image.zip"),
        calls: Arc::new(Mutex::new(0)),
    }
}

fn settle(session: &mut Session, request: Option<crate::session::DecodeRequest>) {
    if let Some(request) = request {
        session.apply_decode(request.run());
    }
}

fn save_strokes(session: &mut Session, count: usize) {
    for i in 0..count {
        session.push_history().unwrap();
        let y = 2.0 + i as f64 * 3.0;
        session
            .active_mut()
            .unwrap()
            .mask_mut()
            .draw_segment(SurfacePoint::new(1.0, y), SurfacePoint::new(10.0, y), 2.0, RED)
            .unwrap();
        session.save_mask().unwrap();
    }
}

/// A.png with two masks, B.jpg with none, C.png with one.
fn populated_session() -> Session {
    let mut session = Session::default();
    let request = session.load_images([
        png_file("A.png", 12, 12),
        png_file("B.jpg", 12, 12),
        png_file("C.png", 12, 12),
    ]);
    settle(&mut session, request);
    save_strokes(&mut session, 2);

    let request = session.set_current_index(2);
    settle(&mut session, request);
    save_strokes(&mut session, 1);
    session
}

fn entry_names(archive: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn read_entry(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).unwrap();
    buffer
}

#[test]
fn archive_has_one_folder_per_image() {
    let session = populated_session();
    let snapshot = ExportSnapshot::capture(&session, "mask");
    assert_eq!(snapshot.image_count(), 3);
    assert_eq!(snapshot.mask_count(), 3);

    let archive = build_archive(&snapshot).unwrap();
    assert_eq!(
        entry_names(&archive),
        [
            "A/",
            "A/A.png",
            "A/mask_1.png",
            "A/mask_2.png",
            "B/",
            "B/B.jpg",
            "C/",
            "C/C.png",
            "C/mask_1.png",
        ]
    );
}

#[test]
fn archive_preserves_original_bytes_and_mask_order() {
    let session = populated_session();
    let archive = build_archive(&ExportSnapshot::capture(&session, "mask")).unwrap();

    assert_eq!(read_entry(&archive, "A/A.png"), png_bytes(12, 12));
    let saved = session.masks().get("A.png");
    assert_eq!(read_entry(&archive, "A/mask_1.png"), saved[0].to_vec());
    assert_eq!(read_entry(&archive, "A/mask_2.png"), saved[1].to_vec());
}

#[test]
fn colliding_folder_names_are_disambiguated() {
    let mut session = Session::default();
    session.load_images([png_file("cat.png", 2, 2), png_file("cat.jpg", 2, 2)]);

    let archive = build_archive(&ExportSnapshot::capture(&session, "mask")).unwrap();
    assert_eq!(
        entry_names(&archive),
        ["cat (2)/", "cat (2)/cat.jpg", "cat/", "cat/cat.png"]
    );
}

#[test]
fn empty_session_produces_empty_archive() {
    let archive = build_archive(&ExportSnapshot::capture(&Session::default(), "mask")).unwrap();
    assert!(entry_names(&archive).is_empty());
}

#[test]
fn mask_prefix_is_configurable() {
    let session = populated_session();
    let archive = build_archive(&ExportSnapshot::capture(&session, "layer")).unwrap();
    assert!(entry_names(&archive).contains(&"C/layer_1.png".to_string()));
}

#[test]
fn snapshot_ignores_masks_saved_after_capture() {
    let mut session = populated_session();
    let snapshot = ExportSnapshot::capture(&session, "mask");
    save_strokes(&mut session, 1);

    assert_eq!(session.masks().count("C.png"), 2);
    let archive = build_archive(&snapshot).unwrap();
    assert!(!entry_names(&archive).contains(&"C/mask_2.png".to_string()));
}

#[tokio::test]
async fn perform_export_saves_to_file() {
    let saver = mock_saver(false);
    let calls = saver.calls.clone();
    let deps = ExportDependencies {
        saver: Arc::new(saver),
    };
    let request = ExportRequest {
        snapshot: ExportSnapshot::capture(&populated_session(), "mask"),
        destination: ExportDestination::File(ArchiveSaveConfig::default()),
    };

    let result = perform_export(request, Arc::new(deps)).await.unwrap();
    assert_eq!(result.saved_path, Some(PathBuf::from("/tmp/masks_by_image.zip")));
    assert_eq!(result.image_count, 3);
    assert_eq!(result.mask_count, 3);
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn perform_export_memory_skips_saver() {
    let saver = mock_saver(false);
    let calls = saver.calls.clone();
    let deps = ExportDependencies {
        saver: Arc::new(saver),
    };
    let request = ExportRequest {
        snapshot: ExportSnapshot::capture(&populated_session(), "mask"),
        destination: ExportDestination::Memory,
    };

    let result = perform_export(request, Arc::new(deps)).await.unwrap();
    assert!(result.saved_path.is_none());
    assert!(!result.archive_data.is_empty());
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn perform_export_surfaces_save_failure() {
    let deps = ExportDependencies {
        saver: Arc::new(mock_saver(true)),
    };
    let request = ExportRequest {
        snapshot: ExportSnapshot::capture(&populated_session(), "mask"),
        destination: ExportDestination::File(ArchiveSaveConfig::default()),
    };

    let err = perform_export(request, Arc::new(deps)).await.unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}

#[tokio::test]
async fn test_export_manager_creation() {
    let manager = ExportManager::new(&tokio::runtime::Handle::current());
    assert_eq!(manager.get_status().await, ExportStatus::Idle);
    assert!(manager.try_take_result().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn export_manager_reports_failure_without_touching_session() {
    let session = populated_session();
    let manager = ExportManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        ExportDependencies {
            saver: Arc::new(mock_saver(true)),
        },
    );

    manager
        .request_export(
            ExportSnapshot::capture(&session, "mask"),
            ExportDestination::File(ArchiveSaveConfig::default()),
        )
        .unwrap();

    match manager.wait_for_result().await {
        ExportOutcome::Failed(message) => assert!(message.contains("disk full")),
        ExportOutcome::Success(_) => panic!("expected failure"),
    }
    assert!(matches!(manager.get_status().await, ExportStatus::Failed(_)));
    assert_eq!(session.len(), 3);
    assert_eq!(session.masks().total(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn export_manager_delivers_archive() {
    let manager = ExportManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        ExportDependencies {
            saver: Arc::new(mock_saver(false)),
        },
    );
    manager
        .request_export(
            ExportSnapshot::capture(&populated_session(), "mask"),
            ExportDestination::Memory,
        )
        .unwrap();

    match manager.wait_for_result().await {
        ExportOutcome::Success(result) => {
            assert_eq!(entry_names(&result.archive_data).len(), 9);
        }
        ExportOutcome::Failed(message) => panic!("export failed: {message}"),
    }
    assert_eq!(manager.get_status().await, ExportStatus::Success);

    manager.reset().await;
    assert_eq!(manager.get_status().await, ExportStatus::Idle);
    assert!(manager.try_take_result().is_none());
}

#[test]
fn request_export_fails_when_manager_stopped() {
    let manager = ExportManager::with_closed_channel_for_test();
    let err = manager
        .request_export(ExportSnapshot::default(), ExportDestination::Memory)
        .unwrap_err();
    assert!(matches!(err, ExportError::NotRunning));
}
