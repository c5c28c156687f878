// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application entry points.
//!
//! `Annotator` ties the configuration, the editing core and a host together:
//! it opens single sessions and drives batch runs, handing every event the
//! host produces to the session and every resulting frame back to the host.

use crate::config::AnnotatorConfig;
use crate::editor::handles::HandleDetector;
use crate::editor::history::ActionHistory;
use crate::editor::session::{EditorSession, SessionControl, SessionReport};
use crate::io::labels::label_path_for;
use crate::io::media::image_dimensions;
use crate::io::persistence::PersistenceManager;
use crate::models::classes::ClassCatalog;
use crate::models::store::BoxStore;
use crate::ui::overlay::RenderFrame;
use crate::ui::EditorHost;
use crate::util::geometry::ViewportState;
use crate::workflow::batch::{BatchSummary, BatchWorkflowController, Preload, SessionRunner};
use crate::workflow::policy::BatchPolicy;
use anyhow::Result;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Main application state.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: AnnotatorConfig,
    classes: ClassCatalog,
}

impl Annotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        let classes = ClassCatalog::new(config.classes.clone());
        Self { config, classes }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Edit one image, starting from its existing labels.
    ///
    /// Returns the label file path if anything was saved.
    pub fn open_session(&self, image: &Path, output_dir: &Path, host: &mut dyn EditorHost) -> Option<PathBuf> {
        self.annotate_image(image, output_dir, Preload::Existing, host)
            .annotation_path
    }

    /// Run one editing session to completion.
    ///
    /// An unreadable image yields an empty report; the host is never asked
    /// for events in that case.
    pub fn annotate_image(
        &self,
        image: &Path,
        output_dir: &Path,
        preload: Preload,
        host: &mut dyn EditorHost,
    ) -> SessionReport {
        let (width, height) = match image_dimensions(image) {
            Ok(size) => size,
            Err(e) => {
                log::error!("{:#}", e);
                return SessionReport::default();
            }
        };
        log::info!("Loaded image: {} ({}x{})", image.display(), width, height);

        let persistence = PersistenceManager::new(
            label_path_for(image, output_dir),
            width,
            height,
            self.config.auto_save,
            self.config.auto_save_interval(),
            host.now(),
        );
        let boxes = match preload {
            Preload::Existing => persistence.load(),
            Preload::Empty => Vec::new(),
        };

        let mut session = EditorSession::new(
            BoxStore::with_boxes(width, height, boxes),
            ViewportState::fit(
                width,
                height,
                self.config.max_display_width,
                self.config.max_display_height,
            ),
            self.classes.clone(),
            HandleDetector::new(self.config.handle_size),
            ActionHistory::new(self.config.max_history),
            persistence,
        );

        host.repaint(&RenderFrame::from_session(&session));
        while let Some(event) = host.next_event() {
            let control = session.handle_event(event, host.now());
            host.repaint(&RenderFrame::from_session(&session));
            if control == SessionControl::Finished {
                break;
            }
        }

        let report = session.finish(host.now());
        log::info!(
            "Session for {} ended with {} boxes{}",
            image.display(),
            report.box_count,
            if report.user_cancelled { " (cancelled)" } else { "" }
        );
        report
    }

    /// Annotate a whole directory, asking `host_for` for a host per image.
    pub fn run_batch<H, F>(
        &self,
        image_dir: &Path,
        output_dir: &Path,
        policy: &mut dyn BatchPolicy,
        host_for: F,
    ) -> Result<BatchSummary>
    where
        H: EditorHost,
        F: FnMut(&Path) -> H,
    {
        let mut runner = HostedRunner {
            annotator: self,
            host_for,
            host: PhantomData,
        };
        BatchWorkflowController::new(&self.config).run(image_dir, output_dir, policy, &mut runner)
    }
}

/// Opens batch sessions through a fresh host per image.
struct HostedRunner<'a, F, H> {
    annotator: &'a Annotator,
    host_for: F,
    host: PhantomData<fn() -> H>,
}

impl<H, F> SessionRunner for HostedRunner<'_, F, H>
where
    H: EditorHost,
    F: FnMut(&Path) -> H,
{
    fn annotate(&mut self, image: &Path, output_dir: &Path, preload: Preload) -> SessionReport {
        let mut host = (self.host_for)(image);
        self.annotator.annotate_image(image, output_dir, preload, &mut host)
    }
}
