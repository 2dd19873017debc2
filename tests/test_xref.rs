//! End-to-end cross-reference resolution over synthetic documents.

use pdf_xref::{
    Compression, Error, Location, Object, Reader, XrefConfig, XrefTable,
};
use proptest::prelude::*;
use std::io::Cursor;

/// Byte-accurate document assembler: every `push` returns the offset the
/// fragment landed at, so xref rows can point at real positions.
struct PdfBuilder {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self::with_header(b"%PDF-1.6\n")
    }

    fn with_header(header: &[u8]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            data: header.to_vec(),
        }
    }

    fn mark(&self) -> u64 {
        self.data.len() as u64
    }

    fn push(&mut self, bytes: &[u8]) -> u64 {
        let at = self.mark();
        self.data.extend_from_slice(bytes);
        at
    }

    fn push_str(&mut self, text: &str) -> u64 {
        self.push(text.as_bytes())
    }

    fn finish(self) -> Vec<u8> {
        self.data
    }

    fn table(self) -> XrefTable<Cursor<Vec<u8>>> {
        XrefTable::new(Reader::from_bytes(self.finish())).unwrap()
    }
}

fn row(offset: u64, gen: u32, ty: char) -> String {
    format!("{:010} {:05} {} \n", offset, gen, ty)
}

/// One xref stream entry for `/W [1 2 1]`.
fn stream_entry(ty: u8, field2: u64, field3: u8) -> [u8; 4] {
    [ty, (field2 >> 8) as u8, (field2 & 0xFF) as u8, field3]
}

/// Base document plus one incremental update redefining object 1.
fn updated_pdf() -> (Vec<u8>, u64, u64) {
    let mut b = PdfBuilder::new();
    let obj1_v1 = b.push(b"1 0 obj\n(first version)\nendobj\n");
    let obj2 = b.push(b"2 0 obj\n<</Type /Pages /Count 0>>\nendobj\n");
    let xref1 = b.mark();
    b.push_str("xref\n0 3\n");
    b.push_str(&row(0, 65535, 'f'));
    b.push_str(&row(obj1_v1, 0, 'n'));
    b.push_str(&row(obj2, 0, 'n'));
    b.push_str(&format!(
        "trailer\n<</Size 3 /Root 1 0 R /Info 2 0 R>>\nstartxref\n{}\n%%EOF\n",
        xref1
    ));

    let obj1_v2 = b.push(b"1 0 obj\n(second version)\nendobj\n");
    let xref2 = b.mark();
    b.push_str("xref\n1 1\n");
    b.push_str(&row(obj1_v2, 0, 'n'));
    b.push_str(&format!(
        "trailer\n<</Size 4 /Prev {}>>\nstartxref\n{}\n%%EOF",
        xref1, xref2
    ));

    (b.finish(), obj1_v1, obj1_v2)
}

#[test]
fn test_update_section_wins() {
    let (data, obj1_v1, obj1_v2) = updated_pdf();
    let mut table = XrefTable::new(Reader::from_bytes(data)).unwrap();

    let loc = table.offset_for(1, None).unwrap();
    assert_eq!(loc, Some(Location::Offset(obj1_v2)));
    assert_ne!(loc, Some(Location::Offset(obj1_v1)));

    let value = table.fetch(1, None).unwrap().unwrap();
    assert_eq!(value.as_string(), Some(&b"second version"[..]));
}

#[test]
fn test_trailer_merge_is_first_writer_wins() {
    let (data, _, _) = updated_pdf();
    let table = XrefTable::new(Reader::from_bytes(data)).unwrap();

    // Size comes from the newest trailer, Root and Info survive from the
    // base one
    assert_eq!(table.size(), Some(4));
    assert!(table.trailer().contains_key("Root"));
    assert!(table.trailer().contains_key("Info"));
    assert_eq!(table.compression(), Compression::None);
    assert_eq!(table.defined_object_ids(), vec![1, 2]);
}

#[test]
fn test_lazy_and_eager_agree() {
    let (data, _, _) = updated_pdf();
    let mut lazy = XrefTable::new(Reader::from_bytes(data.clone())).unwrap();
    let mut eager =
        XrefTable::with_config(Reader::from_bytes(data), XrefConfig::eager()).unwrap();

    assert_eq!(lazy.defined_object_ids(), eager.defined_object_ids());
    assert_eq!(lazy.trailer(), eager.trailer());
    for id in lazy.defined_object_ids() {
        assert_eq!(
            lazy.offset_for(id, None).unwrap(),
            eager.offset_for(id, None).unwrap(),
            "object {}",
            id
        );
        assert_eq!(
            lazy.generation_for(id).unwrap(),
            eager.generation_for(id).unwrap()
        );
    }
}

#[test]
fn test_freed_object_is_tombstoned() {
    let mut b = PdfBuilder::new();
    let obj1 = b.push(b"1 0 obj\n<</Type /Catalog>>\nendobj\n");
    let obj2 = b.push(b"2 0 obj\n(doomed)\nendobj\n");
    let xref1 = b.mark();
    b.push_str("xref\n0 3\n");
    b.push_str(&row(0, 65535, 'f'));
    b.push_str(&row(obj1, 0, 'n'));
    b.push_str(&row(obj2, 0, 'n'));
    b.push_str(&format!(
        "trailer\n<</Size 3 /Root 1 0 R>>\nstartxref\n{}\n%%EOF\n",
        xref1
    ));

    let xref2 = b.mark();
    b.push_str("xref\n2 1\n");
    b.push_str(&row(0, 1, 'f'));
    b.push_str(&format!(
        "trailer\n<</Size 3 /Prev {}>>\nstartxref\n{}\n%%EOF",
        xref1, xref2
    ));

    let mut table = b.table();
    // the newer free entry shadows the older definition, and stays
    // shadowed on repeated lookups
    assert_eq!(table.offset_for(2, None).unwrap(), None);
    assert_eq!(table.offset_for(2, None).unwrap(), None);
    assert_eq!(table.generation_for(2).unwrap(), None);
    assert_eq!(table.fetch(2, None).unwrap(), None);
    // its sibling still resolves through the Prev chain
    assert_eq!(table.offset_for(1, None).unwrap(), Some(Location::Offset(obj1)));
}

#[test]
fn test_cyclic_prev_chain_fails() {
    let mut b = PdfBuilder::new();
    let obj1 = b.push(b"1 0 obj\nnull\nendobj\n");
    let xref = b.mark();
    b.push_str("xref\n0 2\n");
    b.push_str(&row(0, 65535, 'f'));
    b.push_str(&row(obj1, 0, 'n'));
    // Prev points back at this very section
    b.push_str(&format!(
        "trailer\n<</Size 2 /Prev {}>>\nstartxref\n{}\n%%EOF",
        xref, xref
    ));

    let err = XrefTable::new(Reader::from_bytes(b.finish())).unwrap_err();
    assert!(matches!(err, Error::InvalidXref(ref msg) if msg.contains("cyclic")));
}

#[test]
fn test_xref_stream_document() {
    // header padded so object 1 sits at byte 16: its /W [1 2 1] row must
    // then be exactly 01 00 10 00
    let mut b = PdfBuilder::with_header(b"%PDF-1.6\n%micro\n");
    let obj1 = b.push(b"1 0 obj\n<</Type /Catalog /Pages 4 0 R>>\nendobj\n");
    assert_eq!(obj1, 16);

    // object stream holding objects 4 and 5
    let content = "42 <</Kind /Inner>>";
    let header = "4 0 5 3 ";
    let body = format!("{}{}", header, content);
    let obj2 = b.push_str(&format!(
        "2 0 obj\n<</Type /ObjStm /N 2 /First {} /Length {}>>\nstream\n{}\nendstream\nendobj\n",
        header.len(),
        body.len(),
        body
    ));

    let obj3 = b.mark();
    let mut rows = Vec::new();
    rows.extend_from_slice(&stream_entry(0, 0, 0));
    rows.extend_from_slice(&stream_entry(1, obj1, 0));
    rows.extend_from_slice(&stream_entry(1, obj2, 0));
    rows.extend_from_slice(&stream_entry(1, obj3, 0));
    rows.extend_from_slice(&stream_entry(2, 2, 0));
    rows.extend_from_slice(&stream_entry(2, 2, 1));
    assert_eq!(rows[4..8], [0x01, 0x00, 0x10, 0x00]);

    b.push_str(&format!(
        "3 0 obj\n<</Type /XRef /Size 6 /Root 1 0 R /W [1 2 1] /Length {}>>\nstream\n",
        rows.len()
    ));
    b.push(&rows);
    b.push(b"\nendstream\nendobj\n");
    b.push_str(&format!("startxref\n{}\n%%EOF", obj3));

    let mut table = b.table();
    assert_eq!(table.compression(), Compression::All);
    assert_eq!(table.size(), Some(6));
    assert_eq!(table.defined_object_ids(), vec![1, 2, 3, 4, 5]);

    // type-1 rows resolve to plain offsets
    assert_eq!(table.offset_for(1, None).unwrap(), Some(Location::Offset(16)));
    // type-0 rows are free
    assert_eq!(table.offset_for(0, None).unwrap(), None);
    // type-2 rows point into the object stream, generation 0
    assert_eq!(
        table.offset_for(4, None).unwrap(),
        Some(Location::InStream {
            stream_id: 2,
            index: 0
        })
    );
    assert_eq!(table.generation_for(4).unwrap(), Some(0));
    // generation mismatch keeps the object unresolved
    assert_eq!(table.offset_for(1, Some(5)).unwrap(), None);

    assert_eq!(table.fetch(4, None).unwrap(), Some(Object::Integer(42)));
    let inner = table.fetch(5, None).unwrap().unwrap();
    assert_eq!(
        inner.as_dict().unwrap().get("Kind").unwrap().as_name(),
        Some("Inner")
    );
    let catalog = table.fetch(1, None).unwrap().unwrap();
    assert_eq!(
        catalog.as_dict().unwrap().get("Type").unwrap().as_name(),
        Some("Catalog")
    );
}

#[test]
fn test_hybrid_document() {
    let mut b = PdfBuilder::new();
    let obj1 = b.push(b"1 0 obj\n<</Type /Catalog>>\nendobj\n");

    // object stream holding object 4
    let content = "(hi)";
    let header = "4 0 ";
    let body = format!("{}{}", header, content);
    let obj2 = b.push_str(&format!(
        "2 0 obj\n<</Type /ObjStm /N 1 /First {} /Length {}>>\nstream\n{}\nendstream\nendobj\n",
        header.len(),
        body.len(),
        body
    ));

    // the side stream maps object 4 into the object stream
    let obj3 = b.mark();
    let rows = stream_entry(2, 2, 0);
    b.push_str(&format!(
        "3 0 obj\n<</Type /XRef /Size 5 /Index [4 1] /W [1 2 1] /Length {}>>\nstream\n",
        rows.len()
    ));
    b.push(&rows);
    b.push(b"\nendstream\nendobj\n");

    let xref = b.mark();
    b.push_str("xref\n0 4\n");
    b.push_str(&row(0, 65535, 'f'));
    b.push_str(&row(obj1, 0, 'n'));
    b.push_str(&row(obj2, 0, 'n'));
    b.push_str(&row(obj3, 0, 'n'));
    b.push_str(&format!(
        "trailer\n<</Size 5 /Root 1 0 R /XRefStm {}>>\nstartxref\n{}\n%%EOF",
        obj3, xref
    ));

    let mut table = b.table();
    assert_eq!(table.compression(), Compression::Hybrid);
    assert_eq!(table.defined_object_ids(), vec![1, 2, 3, 4]);
    assert_eq!(table.offset_for(1, None).unwrap(), Some(Location::Offset(obj1)));
    assert_eq!(
        table.offset_for(4, None).unwrap(),
        Some(Location::InStream {
            stream_id: 2,
            index: 0
        })
    );
    assert_eq!(
        table.fetch(4, None).unwrap(),
        Some(Object::String {
            data: b"hi".to_vec(),
            hex: false
        })
    );
}

#[test]
fn test_broken_hybrid_stream_is_ignored() {
    let mut b = PdfBuilder::new();
    let obj1 = b.push(b"1 0 obj\n<</Type /Catalog>>\nendobj\n");
    let xref = b.mark();
    b.push_str("xref\n0 2\n");
    b.push_str(&row(0, 65535, 'f'));
    b.push_str(&row(obj1, 0, 'n'));
    // XRefStm points at bytes that are not an xref stream
    b.push_str(&format!(
        "trailer\n<</Size 2 /Root 1 0 R /XRefStm {}>>\nstartxref\n{}\n%%EOF",
        obj1, xref
    ));

    let mut table = b.table();
    // the document still resolves through its classic table
    assert_eq!(table.offset_for(1, None).unwrap(), Some(Location::Offset(obj1)));
    assert_eq!(table.compression(), Compression::None);
}

proptest! {
    /// Every object written into a classic table resolves back to the
    /// exact offset it was written at, and materializes to its value.
    #[test]
    fn classic_offsets_round_trip(values in proptest::collection::vec(-1000i64..1000, 1..15)) {
        let mut b = PdfBuilder::new();
        let mut offsets = Vec::new();
        for (i, v) in values.iter().enumerate() {
            offsets.push(b.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, v)));
        }
        let xref = b.mark();
        b.push_str(&format!("xref\n0 {}\n", values.len() + 1));
        b.push_str(&row(0, 65535, 'f'));
        for offset in &offsets {
            b.push_str(&row(*offset, 0, 'n'));
        }
        b.push_str(&format!(
            "trailer\n<</Size {}>>\nstartxref\n{}\n%%EOF",
            values.len() + 1,
            xref
        ));

        let mut table = b.table();
        for (i, (value, offset)) in values.iter().zip(&offsets).enumerate() {
            let id = i as u32 + 1;
            prop_assert_eq!(
                table.offset_for(id, None).unwrap(),
                Some(Location::Offset(*offset))
            );
            prop_assert_eq!(table.fetch(id, None).unwrap(), Some(Object::Integer(*value)));
        }
    }
}
