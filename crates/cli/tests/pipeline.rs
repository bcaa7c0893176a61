//! End-to-end pipeline test: fixture page in, deck out.

use std::io::{Cursor, Read};

use deck_html::SectionExtractor;
use deck_pptx::DeckRenderer;

const FIXTURE: &str = r#"<!DOCTYPE html>
<html>
<head><title>MailingPigeon</title></head>
<body>
    <section class="section" id="mission">
        <h2>Our Mission</h2>
        <p class="mission-line">Deliver every message through the noise.</p>
        <p class="mission-line">No inbox too distant.</p>
        <p class="mission-line">No campaign too large.</p>
        <img src="photo.png" alt="A carrier pigeon in flight">
    </section>
    <section class="section" id="capabilities">
        <h2>What the pigeon does</h2>
    </section>
</body>
</html>
"#;

#[test]
fn test_fixture_page_renders_three_slide_deck() {
    let dir = tempfile::tempdir().unwrap();
    let html_path = dir.path().join("index.html");
    std::fs::write(&html_path, FIXTURE).unwrap();
    image::RgbImage::from_pixel(40, 30, image::Rgb([120, 90, 60]))
        .save(dir.path().join("photo.png"))
        .unwrap();

    let sections = SectionExtractor::new().extract_file(&html_path).unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Our Mission");
    assert_eq!(sections[0].text.len(), 3);
    assert_eq!(sections[0].images.len(), 1);
    assert_eq!(sections[1].id, "capabilities");
    assert!(sections[1].text.is_empty());

    let package = DeckRenderer::new(dir.path()).render(&sections).unwrap();
    assert_eq!(package.slide_count(), 3);

    let output = dir.path().join("deck.pptx");
    package.save(&output).unwrap();
    let bytes = std::fs::read(&output).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    let slide1 = read_entry(&mut archive, "ppt/slides/slide1.xml");
    assert!(slide1.contains("Our Mission"));
    assert!(slide1.contains("<p:pic>"));

    let slide2 = read_entry(&mut archive, "ppt/slides/slide2.xml");
    assert!(slide2.contains("What the pigeon does"));

    let slide3 = read_entry(&mut archive, "ppt/slides/slide3.xml");
    assert_eq!(slide3.matches(r#"prst="roundRect""#).count(), 6);
    assert!(slide3.contains("It scouts."));

    assert!(archive.by_name("ppt/slides/slide4.xml").is_err());
    assert!(archive.by_name("ppt/media/image1.png").is_ok());
}

#[test]
fn test_rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let html_path = dir.path().join("index.html");
    std::fs::write(&html_path, FIXTURE).unwrap();

    let sections = SectionExtractor::new().extract_file(&html_path).unwrap();
    let package = DeckRenderer::new(dir.path()).render(&sections).unwrap();

    let output = dir.path().join("deck.pptx");
    std::fs::write(&output, b"stale bytes from an earlier run").unwrap();
    package.save(&output).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert!(zip::ZipArchive::new(Cursor::new(bytes)).is_ok());
}

fn read_entry(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}
