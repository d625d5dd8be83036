use rust_decimal::Decimal;
use sales_report::pdf::{generate_report_pdf, report_lines, EOF_MARKER, HEADER};
use sales_report::{ReportDocument, ReportLine, ReportSummary, SaleStatus};

fn document(rows: Vec<ReportLine>) -> ReportDocument {
    let summary = ReportSummary::from_lines(&rows).unwrap();
    ReportDocument {
        title: "Reporte de ventas".to_string(),
        filters: Vec::new(),
        rows,
        summary,
        timezone: chrono_tz::America::Mexico_City,
    }
}

fn plain_rows(n: usize) -> Vec<ReportLine> {
    (0..n)
        .map(|i| {
            ReportLine::new(format!("Producto {i}"), 1, Decimal::new(999, 2), SaleStatus::Pending)
                .unwrap()
        })
        .collect()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn find_all(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Parse `startxref` and the xref section, returning (size, offsets).
fn read_xref(pdf: &[u8]) -> (usize, Vec<usize>) {
    let text = String::from_utf8_lossy(pdf);
    let start: usize = text
        .rsplit("startxref\n")
        .next()
        .and_then(|tail| tail.lines().next())
        .and_then(|n| n.trim().parse().ok())
        .expect("startxref value");
    assert_eq!(&pdf[start..start + 5], b"xref\n");

    let section = String::from_utf8_lossy(&pdf[start..]);
    let mut lines = section.lines().skip(1);
    let size: usize = lines
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|n| n.parse().ok())
        .expect("xref subsection header");
    assert_eq!(lines.next(), Some("0000000000 65535 f "));
    let offsets = lines
        .take(size - 1)
        .map(|l| {
            assert!(l.ends_with(" 00000 n "), "bad record {l:?}");
            l[..10].parse::<usize>().unwrap()
        })
        .collect();
    (size, offsets)
}

#[test]
fn starts_with_signature_and_ends_with_eof() {
    for rows in [0, 1, 45] {
        let pdf = generate_report_pdf(&document(plain_rows(rows))).unwrap();
        assert!(pdf.starts_with(HEADER));
        assert!(pdf.ends_with(EOF_MARKER));
    }
}

#[test]
fn xref_offsets_point_at_object_tokens() {
    let pdf = generate_report_pdf(&document(plain_rows(100))).unwrap();
    let (size, offsets) = read_xref(&pdf);
    assert_eq!(offsets.len(), size - 1);
    for (idx, offset) in offsets.iter().enumerate() {
        let token = format!("{} 0 obj\n", idx + 1);
        assert_eq!(
            &pdf[*offset..*offset + token.len()],
            token.as_bytes(),
            "object {}",
            idx + 1
        );
    }
}

#[test]
fn page_count_is_ceil_of_lines_over_forty() {
    for rows in [0, 1, 33, 34, 35, 73, 74, 200] {
        let doc = document(plain_rows(rows));
        let lines = report_lines(&doc).len();
        let expected = lines.div_ceil(40).max(1);
        let pdf = generate_report_pdf(&doc).unwrap();
        assert_eq!(find_all(&pdf, b"/Type /Page "), expected, "{rows} rows");
        assert!(find(&pdf, format!("/Count {expected} >>").as_bytes()).is_some());
    }
}

#[test]
fn forty_five_rows_make_two_pages_and_seven_objects() {
    let doc = document(plain_rows(45));
    let lines = report_lines(&doc);
    assert_eq!(lines.len(), 52);

    let pdf = generate_report_pdf(&doc).unwrap();
    let (size, offsets) = read_xref(&pdf);
    assert_eq!(size, 8);
    assert_eq!(offsets.len(), 7);
    assert!(find(&pdf, b"/Kids [5 0 R 7 0 R] /Count 2").is_some());
    assert!(find(&pdf, b"trailer\n<< /Size 8 /Root 1 0 R >>").is_some());

    // first page carries 40 text blocks, the second the remaining 12
    assert_eq!(find_all(&pdf, b" Tj ET"), 52);
    let second = find(&pdf, b"6 0 obj\n").unwrap();
    assert_eq!(find_all(&pdf[second..], b" Tj ET"), 12);
    assert!(find(&pdf[second..], b"(Total vendido: $449.55) Tj").is_some());
}

#[test]
fn zero_rows_give_one_page_with_zero_totals() {
    let doc = ReportDocument {
        summary: ReportSummary::default(),
        ..document(Vec::new())
    };
    let pdf = generate_report_pdf(&doc).unwrap();
    let (size, _) = read_xref(&pdf);
    assert_eq!(size, 6);
    assert!(find(&pdf, b"/Kids [5 0 R] /Count 1").is_some());
    assert!(find(&pdf, b"50 780 Td (Reporte de ventas) Tj").is_some());
    assert!(find(&pdf, b"(Total de unidades: 0) Tj").is_some());
    assert!(find(&pdf, b"(Total vendido: $0.00) Tj").is_some());
    assert_eq!(find_all(&pdf, b" Tj ET"), 7);
}

#[test]
fn parentheses_and_backslashes_are_escaped_once() {
    let row = ReportLine::new(r"Caja (chica) \ grande", 1, Decimal::ONE, SaleStatus::Received).unwrap();
    let pdf = generate_report_pdf(&document(vec![row])).unwrap();
    assert!(find(&pdf, br"(Caja \(chica\) \\ grande").is_some());
    assert!(find(&pdf, br"\\\\").is_none());
}

#[test]
fn stream_lengths_match_stream_data() {
    let pdf = generate_report_pdf(&document(plain_rows(60))).unwrap();
    let mut rest = &pdf[..];
    let mut streams = 0;
    while let Some(at) = find(rest, b"<< /Length ") {
        let after = &rest[at + 11..];
        let digits = after.iter().take_while(|b| b.is_ascii_digit()).count();
        let length: usize = std::str::from_utf8(&after[..digits]).unwrap().parse().unwrap();
        let data_start = find(after, b"stream\n").unwrap() + 7;
        assert_eq!(&after[data_start + length..data_start + length + 10], b"\nendstream");
        rest = &after[data_start + length..];
        streams += 1;
    }
    assert_eq!(streams, 2);
}

#[test]
fn characters_outside_latin1_are_dropped() {
    let row = ReportLine::new("Té verde 🍵", 1, Decimal::ONE, SaleStatus::Pending)
        .unwrap()
        .with_category("Bebidas");
    let pdf = generate_report_pdf(&document(vec![row])).unwrap();
    assert!(find(&pdf, b"(T\xE9 verde ").is_some());
    assert!(find(&pdf, b"(  Categor\xEDa: Bebidas) Tj").is_some());
    assert!(find(&pdf, "🍵".as_bytes()).is_none());
}
