//! Minimal PDF assembler for the paginated-raster exporter.
//!
//! Emits a PDF 1.4 document with one full-bleed JPEG image XObject per
//! page (DCTDecode passthrough, no recompression) on a fixed
//! 1920 x 1080 media box. Pages appear in input order.

use super::{PAGE_HEIGHT, PAGE_WIDTH};

/// One finished page: JPEG bytes plus pixel dimensions.
#[derive(Debug, Clone)]
pub struct JpegPage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Assembles pages into a complete PDF byte vector.
pub fn assemble(pages: &[JpegPage]) -> Vec<u8> {
    // Object layout: 1 = catalog, 2 = page tree, then three objects per
    // page (page, contents, image) in page order.
    let object_count = 2 + pages.len() * 3;
    let mut buf: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; object_count + 1];

    buf.extend_from_slice(b"%PDF-1.4\n");

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 3 + i * 3))
        .collect();

    begin_obj(&mut buf, &mut offsets, 1);
    buf.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    begin_obj(&mut buf, &mut offsets, 2);
    buf.extend_from_slice(
        format!(
            "<< /Type /Pages /Count {} /Kids [{}] >>\nendobj\n",
            pages.len(),
            kids.join(" ")
        )
        .as_bytes(),
    );

    for (i, page) in pages.iter().enumerate() {
        let page_id = 3 + i * 3;
        let contents_id = page_id + 1;
        let image_id = page_id + 2;

        begin_obj(&mut buf, &mut offsets, page_id);
        buf.extend_from_slice(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /XObject << /Im0 {image_id} 0 R >> >> \
                 /Contents {contents_id} 0 R >>\nendobj\n"
            )
            .as_bytes(),
        );

        // Scale the image to cover the whole page.
        let content = format!("q {PAGE_WIDTH} 0 0 {PAGE_HEIGHT} 0 0 cm /Im0 Do Q\n");
        begin_obj(&mut buf, &mut offsets, contents_id);
        buf.extend_from_slice(format!("<< /Length {} >>\nstream\n", content.len()).as_bytes());
        buf.extend_from_slice(content.as_bytes());
        buf.extend_from_slice(b"endstream\nendobj\n");

        begin_obj(&mut buf, &mut offsets, image_id);
        buf.extend_from_slice(
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode \
                 /Length {} >>\nstream\n",
                page.width,
                page.height,
                page.jpeg.len()
            )
            .as_bytes(),
        );
        buf.extend_from_slice(&page.jpeg);
        buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    let xref_offset = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for id in 1..=object_count {
        buf.extend_from_slice(format!("{:010} 00000 n \n", offsets[id]).as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            object_count + 1
        )
        .as_bytes(),
    );

    buf
}

fn begin_obj(buf: &mut Vec<u8>, offsets: &mut [usize], id: usize) {
    offsets[id] = buf.len();
    buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> JpegPage {
        JpegPage {
            jpeg: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
        }
    }

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    #[test]
    fn emits_one_page_object_per_input_page() {
        let pdf = assemble(&[page(), page(), page()]);
        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert_eq!(count_occurrences(&pdf, b"/Type /Page "), 3);
        assert_eq!(count_occurrences(&pdf, b"/Count 3"), 1);
        assert!(pdf.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = assemble(&[page()]);
        let text = String::from_utf8_lossy(&pdf);
        let xref_at = text.find("xref\n").unwrap();
        // First non-free entry must point at "1 0 obj".
        let entry = &text[xref_at + 29..xref_at + 39];
        let offset: usize = entry.trim_start_matches('0').parse().unwrap();
        assert!(pdf[offset..].starts_with(b"1 0 obj"));
    }

    #[test]
    fn media_box_is_sixteen_by_nine() {
        let pdf = assemble(&[page()]);
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/MediaBox [0 0 1920 1080]"));
    }
}
