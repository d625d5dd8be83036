//! PDF object table.
//!
//! Objects live in an arena indexed by their object number. Slot 0 is the
//! free-list head of the cross-reference table and never holds an object.
//! Parents are reserved before their children exist and filled in once the
//! children's numbers are known.

use std::fmt;

/// Page size in points (US Letter)
const MEDIA_BOX: &str = "[0 0 612 792]";
const FONT_SIZE: u32 = 12;
const LEFT_MARGIN: u32 = 50;
const TOP_Y: i32 = 780;
const LINE_PITCH: i32 = 16;

/// Object number within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Formats as an indirect reference, `N 0 R`
impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfObject {
    Catalog { pages: ObjectId },
    Pages { kids: Vec<ObjectId> },
    Font { base_font: &'static str },
    Content { data: Vec<u8> },
    Page {
        parent: ObjectId,
        contents: ObjectId,
        font: ObjectId,
    },
}

impl PdfObject {
    /// Bytes written between `N 0 obj` and `endobj`
    pub fn body(&self) -> Vec<u8> {
        match self {
            PdfObject::Catalog { pages } => {
                format!("<< /Type /Catalog /Pages {pages} >>").into_bytes()
            }
            PdfObject::Pages { kids } => {
                let refs: Vec<String> = kids.iter().map(ToString::to_string).collect();
                format!(
                    "<< /Type /Pages /Kids [{}] /Count {} >>",
                    refs.join(" "),
                    kids.len()
                )
                .into_bytes()
            }
            PdfObject::Font { base_font } => {
                format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} >>").into_bytes()
            }
            PdfObject::Content { data } => {
                let mut out = format!("<< /Length {} >>\nstream\n", data.len()).into_bytes();
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
                out
            }
            PdfObject::Page {
                parent,
                contents,
                font,
            } => format!(
                "<< /Type /Page /Parent {parent} /MediaBox {MEDIA_BOX} \
                 /Contents {contents} /Resources << /Font << /F1 {font} >> >> >>"
            )
            .into_bytes(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectTable {
    slots: Vec<Option<PdfObject>>,
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectTable {
    pub fn new() -> Self {
        Self { slots: vec![None] }
    }

    /// Claim the next object number without an object yet.
    pub fn reserve(&mut self) -> ObjectId {
        let id = ObjectId(self.slots.len() as u32);
        self.slots.push(None);
        id
    }

    pub fn push(&mut self, object: PdfObject) -> ObjectId {
        let id = ObjectId(self.slots.len() as u32);
        self.slots.push(Some(object));
        id
    }

    /// Fill a slot handed out by [`ObjectTable::reserve`].
    ///
    /// Ids only come from this table, so the slot always exists; filling it
    /// twice is a builder bug.
    pub fn place(&mut self, id: ObjectId, object: PdfObject) {
        let idx = id.0 as usize;
        debug_assert!(
            self.slots.get(idx).is_some_and(Option::is_none),
            "object {idx} was not reserved or is already filled"
        );
        self.slots[idx] = Some(object);
    }

    pub fn get(&self, id: ObjectId) -> Option<&PdfObject> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Number of xref entries, counting the reserved slot 0
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Every real slot in ascending order; `None` marks a reservation that
    /// was never filled.
    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, Option<&PdfObject>)> {
        self.slots
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, slot)| (ObjectId(idx as u32), slot.as_ref()))
    }
}

/// A fully linked object table ready for serialization
#[derive(Debug)]
pub struct DocumentObjects {
    pub table: ObjectTable,
    pub catalog: ObjectId,
    pub pages: ObjectId,
    pub page_ids: Vec<ObjectId>,
}

/// Build catalog, page tree, shared font and one page per chunk of lines.
pub fn build_document(pages: &[&[String]]) -> DocumentObjects {
    let mut table = ObjectTable::new();
    let catalog = table.reserve();
    let pages_id = table.reserve();
    let font = table.push(PdfObject::Font {
        base_font: "Helvetica",
    });

    let mut page_ids = Vec::with_capacity(pages.len());
    for lines in pages {
        let contents = table.push(PdfObject::Content {
            data: content_stream(lines),
        });
        let page = table.push(PdfObject::Page {
            parent: pages_id,
            contents,
            font,
        });
        page_ids.push(page);
    }

    table.place(
        pages_id,
        PdfObject::Pages {
            kids: page_ids.clone(),
        },
    );
    table.place(catalog, PdfObject::Catalog { pages: pages_id });

    DocumentObjects {
        table,
        catalog,
        pages: pages_id,
        page_ids,
    }
}

/// One `BT ... ET` text block per line, top to bottom.
pub fn content_stream(lines: &[String]) -> Vec<u8> {
    let ops: Vec<String> = lines
        .iter()
        .zip((0..).map(|i: i32| TOP_Y - i * LINE_PITCH))
        .map(|(line, y)| {
            format!(
                "BT /F1 {FONT_SIZE} Tf {LEFT_MARGIN} {y} Td ({}) Tj ET",
                escape_text(line)
            )
        })
        .collect();
    encode_latin1(&ops.join("\n"))
}

/// Escape a string for a PDF literal. Backslashes go first so the
/// parenthesis escapes are not doubled.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Latin-1 bytes; characters above U+00FF are dropped.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn reserved_slots_are_filled_in_place() {
        let mut table = ObjectTable::new();
        let a = table.reserve();
        let b = table.push(PdfObject::Font { base_font: "Helvetica" });
        assert_eq!((a.get(), b.get()), (1, 2));
        assert!(table.get(a).is_none());

        table.place(a, PdfObject::Catalog { pages: b });
        assert_eq!(table.get(a), Some(&PdfObject::Catalog { pages: b }));
        assert_eq!(table.size(), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already filled")]
    fn placing_twice_panics_in_debug() {
        let mut table = ObjectTable::new();
        let a = table.reserve();
        table.place(a, PdfObject::Font { base_font: "Helvetica" });
        table.place(a, PdfObject::Font { base_font: "Helvetica" });
    }

    #[test]
    #[should_panic]
    fn placing_an_id_from_another_table_panics() {
        let mut table = ObjectTable::new();
        table.place(ObjectId(4), PdfObject::Font { base_font: "Helvetica" });
    }

    #[test]
    fn ids_are_dense_and_in_allocation_order() {
        let body = lines(3);
        let doc = build_document(&[&body[..], &body[..]]);
        assert_eq!(doc.catalog.get(), 1);
        assert_eq!(doc.pages.get(), 2);
        assert_eq!(doc.table.size(), 8);
        assert_eq!(doc.page_ids.iter().map(|p| p.get()).collect::<Vec<_>>(), [5, 7]);
        assert!(doc.table.entries().all(|(_, obj)| obj.is_some()));
    }

    #[test]
    fn pages_tree_lists_every_page() {
        let body = lines(1);
        let doc = build_document(&[&body[..], &body[..], &body[..]]);
        let Some(PdfObject::Pages { kids }) = doc.table.get(doc.pages) else {
            panic!("pages object missing");
        };
        assert_eq!(kids, &doc.page_ids);
        let text = String::from_utf8(doc.table.get(doc.pages).unwrap().body()).unwrap();
        assert_eq!(text, "<< /Type /Pages /Kids [5 0 R 7 0 R 9 0 R] /Count 3 >>");
    }

    #[test]
    fn every_page_shares_the_font() {
        let body = lines(2);
        let doc = build_document(&[&body[..], &body[..]]);
        for page in &doc.page_ids {
            match doc.table.get(*page) {
                Some(PdfObject::Page { parent, font, contents }) => {
                    assert_eq!(*parent, doc.pages);
                    assert_eq!(font.get(), 3);
                    assert!(matches!(doc.table.get(*contents), Some(PdfObject::Content { .. })));
                }
                other => panic!("expected page, got {other:?}"),
            }
        }
    }

    #[test]
    fn content_stream_steps_down_the_page() {
        let data = content_stream(&["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "BT /F1 12 Tf 50 780 Td (a) Tj ET\n\
             BT /F1 12 Tf 50 764 Td (b) Tj ET\n\
             BT /F1 12 Tf 50 748 Td (c) Tj ET"
        );
    }

    #[test]
    fn stream_length_matches_data() {
        let obj = PdfObject::Content { data: b"BT ET".to_vec() };
        assert_eq!(obj.body(), b"<< /Length 5 >>\nstream\nBT ET\nendstream".to_vec());

        let empty = PdfObject::Content { data: Vec::new() };
        assert_eq!(empty.body(), b"<< /Length 0 >>\nstream\n\nendstream".to_vec());
    }

    #[test]
    fn escape_does_not_double_escape() {
        assert_eq!(escape_text(r"a(b)c\d"), r"a\(b\)c\\d");
        assert_eq!(escape_text(r"\("), r"\\\(");
    }

    #[test]
    fn latin1_keeps_accents_and_drops_the_rest() {
        assert_eq!(encode_latin1("Categoría"), b"Categor\xEDa".to_vec());
        assert_eq!(encode_latin1("café ☕ 茶"), b"caf\xE9  ".to_vec());
    }

    #[test]
    fn page_body_layout() {
        let page = PdfObject::Page {
            parent: ObjectId(2),
            contents: ObjectId(4),
            font: ObjectId(3),
        };
        assert_eq!(
            String::from_utf8(page.body()).unwrap(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 3 0 R >> >> >>"
        );
    }
}
