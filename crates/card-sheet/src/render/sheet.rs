//! Sheet rendering
//!
//! Places card items onto PDF pages following a grid plan. Pages are
//! appended as the placement index crosses each `cells_per_page` boundary and
//! the page tree is written once, when the renderer is consumed by
//! [`SheetRenderer::finish`].

use super::xobject::create_image_xobject;
use crate::constants::{CUT_GUIDE_LINE_WIDTH, PLACEHOLDER_LINE_WIDTH, mm_to_pt};
use crate::content::{CardItem, CardRaster, RasterTarget, finish_card, load_artwork};
use crate::layout::{GridPlan, Rect, placement_of};
use crate::stats::SheetStatistics;
use crate::types::{CardSheetError, Mirror, Result};
use log::{debug, error, info, warn};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::rc::Rc;

/// RGB stroke colour for placeholder outlines
const PLACEHOLDER_STROKE: (f32, f32, f32) = (0.85, 0.1, 0.1);

/// RGB stroke colour for cut guides
const CUT_GUIDE_STROKE: (f32, f32, f32) = (0.0, 0.0, 0.0);

// =============================================================================
// Public API
// =============================================================================

/// Render `items` into a new document, one grid slot per item in order.
///
/// Items that cannot be drawn are logged and replaced with an outlined
/// placeholder in their slot.
pub fn render(
    items: &[CardItem],
    plan: &GridPlan,
    mirror: Mirror,
    target: &RasterTarget,
) -> Result<(Document, SheetStatistics)> {
    plan.ensure_fits()?;
    if items.is_empty() {
        return Err(CardSheetError::NoCards);
    }

    let mut renderer = SheetRenderer::new(plan);
    let mut placeholders = 0;

    for (index, item) in items.iter().enumerate() {
        if !renderer.draw_item(index, item, mirror, target)? {
            placeholders += 1;
        }
    }

    let doc = renderer.finish();
    let stats = SheetStatistics::new(plan, items.len(), placeholders);
    info!(
        "Rendered {} cards on {} pages ({} placeholders)",
        stats.cards, stats.pages, stats.placeholders
    );
    Ok((doc, stats))
}

/// One page with an outlined rectangle at every grid slot
pub fn render_cut_guide(plan: &GridPlan) -> Result<Document> {
    plan.ensure_fits()?;

    let mut renderer = SheetRenderer::new(plan);
    for index in 0..plan.cells_per_page {
        let placement = placement_of(index, plan, Mirror::NONE);
        renderer.begin_item(index);
        renderer.outline(&placement.rect, CUT_GUIDE_STROKE, CUT_GUIDE_LINE_WIDTH);
    }
    info!("Rendered cut guide with {} cells", plan.cells_per_page);
    Ok(renderer.finish())
}

// =============================================================================
// Renderer
// =============================================================================

/// Append-only output document under construction
pub struct SheetRenderer {
    doc: Document,
    pages_id: ObjectId,
    page_refs: Vec<Object>,
    page_size_pt: (f32, f32),
    cells_per_page: usize,
    plan: GridPlan,
    current: Option<PageBuilder>,
    /// Embedded rasters keyed by the address of their shared allocation.
    /// The `Rc` is held so the address cannot be reused.
    xobject_cache: HashMap<*const CardRaster, (Rc<CardRaster>, ObjectId)>,
}

#[derive(Default)]
struct PageBuilder {
    content_ops: Vec<String>,
    xobjects: Dictionary,
    names: HashMap<ObjectId, String>,
}

impl SheetRenderer {
    pub fn new(plan: &GridPlan) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_refs: Vec::new(),
            page_size_pt: (mm_to_pt(plan.page.width), mm_to_pt(plan.page.height)),
            cells_per_page: plan.cells_per_page.max(1),
            plan: *plan,
            current: None,
            xobject_cache: HashMap::new(),
        }
    }

    /// Number of pages started so far
    pub fn page_count(&self) -> usize {
        self.page_refs.len() + usize::from(self.current.is_some())
    }

    /// Start a new page when `index` is the first slot of one
    fn begin_item(&mut self, index: usize) {
        if index % self.cells_per_page == 0 || self.current.is_none() {
            self.flush_page();
            debug!("Starting page {}", self.page_refs.len() + 1);
            self.current = Some(PageBuilder::default());
        }
    }

    /// Draw one item in its grid slot.
    ///
    /// Returns `false` when the item could not be drawn and a placeholder
    /// outline took its place.
    pub fn draw_item(
        &mut self,
        index: usize,
        item: &CardItem,
        mirror: Mirror,
        target: &RasterTarget,
    ) -> Result<bool> {
        let placement = placement_of(index, &self.plan, mirror);
        self.begin_item(index);

        match item {
            CardItem::Raster(raster) => {
                let image_id = self.embed_shared(raster)?;
                self.place_image(image_id, &placement.rect);
                Ok(true)
            }
            CardItem::File(path) => match load_artwork(path, "card image") {
                Ok(img) => {
                    let raster = finish_card(img, target);
                    let image_id = create_image_xobject(&mut self.doc, &raster)?;
                    self.place_image(image_id, &placement.rect);
                    Ok(true)
                }
                Err(e) => {
                    error!("Card {}: {}; drawing placeholder", index + 1, e);
                    self.placeholder(&placement.rect);
                    Ok(false)
                }
            },
            CardItem::Failed { label, reason } => {
                warn!("Card {} ({}): {}; drawing placeholder", index + 1, label, reason);
                self.placeholder(&placement.rect);
                Ok(false)
            }
        }
    }

    /// Embed a shared raster once per document
    fn embed_shared(&mut self, raster: &Rc<CardRaster>) -> Result<ObjectId> {
        let key = Rc::as_ptr(raster);
        if let Some((_, id)) = self.xobject_cache.get(&key) {
            return Ok(*id);
        }
        let id = create_image_xobject(&mut self.doc, raster)?;
        self.xobject_cache.insert(key, (Rc::clone(raster), id));
        Ok(id)
    }

    fn place_image(&mut self, image_id: ObjectId, rect: &Rect) {
        let r = rect.to_points();
        let page = self.page();
        let name = match page.names.get(&image_id) {
            Some(name) => name.clone(),
            None => {
                let name = format!("Im{}", page.names.len());
                page.xobjects.set(name.as_bytes(), Object::Reference(image_id));
                page.names.insert(image_id, name.clone());
                name
            }
        };
        page.content_ops.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            r.width, r.height, r.x, r.y, name
        ));
    }

    fn placeholder(&mut self, rect: &Rect) {
        self.outline(rect, PLACEHOLDER_STROKE, PLACEHOLDER_LINE_WIDTH);
    }

    fn outline(&mut self, rect: &Rect, colour: (f32, f32, f32), line_width: f32) {
        let r = rect.to_points();
        let (red, green, blue) = colour;
        self.page().content_ops.push(format!(
            "q {} w {} {} {} RG {} {} {} {} re S Q\n",
            line_width, red, green, blue, r.x, r.y, r.width, r.height
        ));
    }

    fn page(&mut self) -> &mut PageBuilder {
        self.current.get_or_insert_with(PageBuilder::default)
    }

    fn flush_page(&mut self) {
        let Some(page) = self.current.take() else {
            return;
        };

        let (width_pt, height_pt) = self.page_size_pt;
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ]),
        );

        let mut resources = Dictionary::new();
        if !page.xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(page.xobjects));
        }

        let content = page.content_ops.join("");
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.doc.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
    }

    /// Close the last page and write the page tree and catalog
    pub fn finish(mut self) -> Document {
        self.flush_page();

        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }
}
