//! Multi-image annotation session.
//!
//! An [`AnnotationSession`] is the host-side owner of every image's annotation
//! set. Only one image is live in the editor at a time; the others sit in the
//! store until [`AnnotationSession::open_image`] swaps them in. One clipboard is
//! shared across all of them, so copy on one image and paste on another works.
//!
//! The session also tracks a [`ReviewStatus`] per image and offers the bulk
//! operations the editor itself does not: orphan reconciliation after the
//! category list changes, and merging pre-label results from a detector.

use std::collections::{BTreeMap, HashMap};

use crate::clipboard::{ClipboardBuffer, SharedClipboard};
use crate::config::EditorConfig;
use crate::constants::UNASSIGNED_CATEGORY_ID;
use crate::editor::{AnnotationEditor, EventRecorder};
use crate::format::{FormatError, yolo};
use crate::model::{Annotation, AnnotationId, Category};
use crate::palette::ClassPalette;

/// Labeling progress of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    /// No annotations yet
    Unlabeled,
    /// Every annotation has a known category
    Labeled,
    /// At least one annotation references a category not in the palette
    HasOrphans,
}

/// What to do with annotations whose category no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    Keep,
    Reassign(i32),
    Delete,
}

/// Translation from an external label set to palette category ids.
///
/// Sources without an entry pass through unchanged. A target of `-1` drops
/// annotations of that source category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMapping {
    map: HashMap<i32, i32>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: i32, target: i32) -> Self {
        self.insert(source, target);
        self
    }

    pub fn insert(&mut self, source: i32, target: i32) {
        self.map.insert(source, target);
    }

    /// Target for `source`, or `None` if it should be skipped.
    pub fn target_for(&self, source: i32) -> Option<i32> {
        match self.map.get(&source) {
            Some(&UNASSIGNED_CATEGORY_ID) => None,
            Some(&target) => Some(target),
            None => Some(source),
        }
    }

    /// Remap categories, dropping skipped ones.
    pub fn apply(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations
            .into_iter()
            .filter_map(|mut ann| {
                ann.category_id = self.target_for(ann.category_id)?;
                Some(ann)
            })
            .collect()
    }
}

/// Compute the review status of one annotation set.
pub fn review_status(annotations: &[Annotation], palette: &ClassPalette) -> ReviewStatus {
    if annotations.is_empty() {
        ReviewStatus::Unlabeled
    } else if annotations.iter().any(|a| !palette.contains(a.category_id)) {
        ReviewStatus::HasOrphans
    } else {
        ReviewStatus::Labeled
    }
}

/// Apply `policy` to annotations whose category is missing from `palette`.
///
/// Returns the number of orphaned annotations found. With
/// [`OrphanPolicy::Reassign`] to a category that is itself missing nothing is
/// changed and 0 is returned.
pub fn reconcile_orphans(
    annotations: &mut Vec<Annotation>,
    palette: &ClassPalette,
    policy: OrphanPolicy,
) -> usize {
    let is_orphan = |ann: &Annotation| !palette.contains(ann.category_id);
    let orphans = annotations.iter().filter(|a| is_orphan(a)).count();
    if orphans == 0 {
        return 0;
    }

    match policy {
        OrphanPolicy::Keep => {}
        OrphanPolicy::Reassign(target) => {
            if !palette.contains(target) {
                log::warn!("Cannot reassign orphans to unknown category {}", target);
                return 0;
            }
            for ann in annotations.iter_mut().filter(|a| is_orphan(a)) {
                ann.category_id = target;
            }
        }
        OrphanPolicy::Delete => annotations.retain(|a| !is_orphan(a)),
    }
    orphans
}

/// Stored state of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub width: f32,
    pub height: f32,
    /// Empty while the image is open in the editor
    annotations: Vec<Annotation>,
    status: ReviewStatus,
}

impl ImageRecord {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            annotations: Vec::new(),
            status: ReviewStatus::Unlabeled,
        }
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }
}

/// Per-image annotation store around a single live editor.
pub struct AnnotationSession {
    editor: AnnotationEditor,
    clipboard: SharedClipboard,
    images: BTreeMap<String, ImageRecord>,
    active: Option<String>,
    recorder: EventRecorder,
}

impl AnnotationSession {
    pub fn new(config: &EditorConfig) -> Self {
        let clipboard = ClipboardBuffer::shared();
        let mut editor = AnnotationEditor::new(config, std::rc::Rc::clone(&clipboard));
        let recorder = EventRecorder::new();
        editor.subscribe(Box::new(recorder.clone()));
        Self {
            editor,
            clipboard,
            images: BTreeMap::new(),
            active: None,
            recorder,
        }
    }

    pub fn editor(&self) -> &AnnotationEditor {
        &self.editor
    }

    pub fn clipboard(&self) -> &SharedClipboard {
        &self.clipboard
    }

    pub fn active_image(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.images.keys().map(String::as_str)
    }

    pub fn status(&self, name: &str) -> Option<ReviewStatus> {
        self.images.get(name).map(ImageRecord::status)
    }

    /// Number of images in each status.
    pub fn status_counts(&self) -> HashMap<ReviewStatus, usize> {
        let mut counts = HashMap::new();
        for record in self.images.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }

    /// Annotations of `name`, live ones if it is the open image.
    pub fn annotations_for(&self, name: &str) -> Option<&[Annotation]> {
        if self.active.as_deref() == Some(name) {
            return Some(self.editor.annotations());
        }
        self.images.get(name).map(|r| r.annotations.as_slice())
    }

    /// Register an image with its persisted annotations.
    ///
    /// Replaces any stored set. Registering the open image refreshes the
    /// editor instead.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        width: f32,
        height: f32,
        annotations: Vec<Annotation>,
    ) {
        let name = name.into();
        if self.active.as_deref() == Some(name.as_str()) {
            self.editor.refresh_annotations(annotations);
        } else {
            let record = self
                .images
                .entry(name)
                .or_insert_with(|| ImageRecord::new(width, height));
            record.width = width;
            record.height = height;
            record.annotations = annotations;
        }
        self.recompute_statuses();
    }

    /// Make `name` the live image.
    ///
    /// The outgoing image's set goes back into the store first. Unknown names
    /// are registered with an empty set.
    pub fn open_image(&mut self, name: impl Into<String>, width: f32, height: f32) {
        let name = name.into();
        if self.active.as_deref() == Some(name.as_str()) {
            return;
        }
        self.sync();

        let incoming = {
            let record = self
                .images
                .entry(name.clone())
                .or_insert_with(|| ImageRecord::new(width, height));
            record.width = width;
            record.height = height;
            std::mem::take(&mut record.annotations)
        };

        let outgoing = self.editor.activate_image(width, height, incoming);
        if let Some(previous) = self.active.take() {
            if let Some(record) = self.images.get_mut(&previous) {
                record.status = review_status(&outgoing, self.editor.palette());
                record.annotations = outgoing;
            }
        }

        log::info!("Opened image '{}'", name);
        self.active = Some(name);
        self.recompute_statuses();
    }

    /// Run `f` against the live editor, then refresh review status from any
    /// set-changed notifications it produced.
    pub fn dispatch<R>(&mut self, f: impl FnOnce(&mut AnnotationEditor) -> R) -> R {
        let result = f(&mut self.editor);
        self.sync();
        result
    }

    /// Drain editor notifications. Returns true if the live set changed.
    pub fn sync(&mut self) -> bool {
        let changed = self.recorder.set_changed_count() > 0;
        self.recorder.take();
        if changed {
            self.refresh_active_status();
        }
        changed
    }

    fn refresh_active_status(&mut self) {
        let Some(active) = self.active.as_deref() else {
            return;
        };
        let status = review_status(self.editor.annotations(), self.editor.palette());
        if let Some(record) = self.images.get_mut(active) {
            if record.status != status {
                log::debug!("Image '{}' is now {:?}", active, status);
            }
            record.status = status;
        }
    }

    fn recompute_statuses(&mut self) {
        let palette = self.editor.palette();
        for (name, record) in self.images.iter_mut() {
            if self.active.as_deref() != Some(name.as_str()) {
                record.status = review_status(&record.annotations, palette);
            }
        }
        self.refresh_active_status();
    }

    /// Replace the category list and re-evaluate every image.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.editor.set_categories(categories);
        self.recorder.take();
        self.recompute_statuses();
    }

    /// Apply an orphan policy to every image. Returns the total orphan count.
    ///
    /// The open image is updated through the editor so the change is undoable.
    pub fn reconcile(&mut self, policy: OrphanPolicy) -> usize {
        let palette = self.editor.palette().clone();
        let mut total = 0;

        for (name, record) in self.images.iter_mut() {
            if self.active.as_deref() == Some(name.as_str()) {
                continue;
            }
            total += reconcile_orphans(&mut record.annotations, &palette, policy);
        }

        if self.active.is_some() {
            let mut live = self.editor.annotations().to_vec();
            let found = reconcile_orphans(&mut live, &palette, policy);
            if found > 0 && policy != OrphanPolicy::Keep {
                self.editor.refresh_annotations(live);
            }
            total += found;
        }

        log::info!("Reconciled {} orphaned annotations with {:?}", total, policy);
        self.recompute_statuses();
        total
    }

    /// Merge detector output into the stored or live sets.
    ///
    /// Categories are translated through `mapping` first. Results for images
    /// the session does not know are ignored. Returns the number of
    /// annotations added.
    pub fn apply_prelabels(
        &mut self,
        results: impl IntoIterator<Item = (String, Vec<Annotation>)>,
        mapping: &CategoryMapping,
    ) -> usize {
        let mut added = 0;
        for (name, labels) in results {
            let labels = mapping.apply(labels);
            if labels.is_empty() {
                continue;
            }

            if self.active.as_deref() == Some(name.as_str()) {
                let mut merged = self.editor.annotations().to_vec();
                added += labels.len();
                // Id 0 makes the editor allocate past every id it has issued
                merged.extend(labels.into_iter().map(|mut ann| {
                    ann.id = 0;
                    ann
                }));
                self.editor.refresh_annotations(merged);
            } else if let Some(record) = self.images.get_mut(&name) {
                added += labels.len();
                let start = next_free_id(&record.annotations);
                record.annotations.extend(renumber(labels, start));
            } else {
                log::warn!("Pre-labels for unknown image '{}' ignored", name);
            }
        }

        log::info!("Applied {} pre-label annotations", added);
        self.recompute_statuses();
        added
    }

    /// Export one image as YOLO text.
    pub fn export_yolo(&self, name: &str) -> Option<String> {
        let record = self.images.get(name)?;
        let annotations = self.annotations_for(name)?;
        Some(yolo::encode(annotations, record.width, record.height))
    }

    /// Decode YOLO text for one image and merge it as pre-labels.
    pub fn import_yolo(
        &mut self,
        name: &str,
        text: &str,
        mapping: &CategoryMapping,
    ) -> Result<usize, FormatError> {
        let Some(record) = self.images.get(name) else {
            log::warn!("YOLO import for unknown image '{}' ignored", name);
            return Ok(0);
        };
        let decoded = yolo::decode(text, record.width, record.height)?;
        Ok(self.apply_prelabels([(name.to_string(), decoded)], mapping))
    }
}

impl std::fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("images", &self.images.len())
            .field("active", &self.active)
            .field("editor", &self.editor)
            .finish()
    }
}

fn next_free_id(annotations: &[Annotation]) -> AnnotationId {
    annotations.iter().map(|a| a.id).max().unwrap_or(0) + 1
}

fn renumber(labels: Vec<Annotation>, start: AnnotationId) -> impl Iterator<Item = Annotation> {
    labels.into_iter().zip(start..).map(|(mut ann, id)| {
        ann.id = id;
        ann
    })
}
