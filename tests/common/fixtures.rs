use coverpress::{CoverRecord, GroupMember};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A filled-in individual submission.
pub fn individual_record() -> CoverRecord {
    CoverRecord {
        university: "United International University".to_string(),
        department: "Department of Computer Science and Engineering".to_string(),
        course: "CSE 2215 - Data Structure and Algorithms - I".to_string(),
        assignment_title: "Assignment 2: Balanced Trees".to_string(),
        submitted_to: "Dr. Rahman".to_string(),
        submitted_by: "Md Tanzamul Azad".to_string(),
        student_id: "011221001".to_string(),
        section: "A".to_string(),
        trimester: "Spring 2024".to_string(),
        submission_date: "2024-05-30".to_string(),
        ..Default::default()
    }
}

pub fn group_record() -> CoverRecord {
    CoverRecord {
        is_group: true,
        group_name: "Byte  Busters".to_string(),
        group_members: vec![
            GroupMember {
                name: "Ayesha Khan".to_string(),
                id: "011221002".to_string(),
            },
            GroupMember {
                name: "Rafi Ahmed".to_string(),
                id: "011221003".to_string(),
            },
        ],
        ..individual_record()
    }
}

/// A PDF whose pages read "{prefix} 1", "{prefix} 2", …; resources and
/// media box are inherited from the page tree root.
pub fn text_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids: Vec<Object> = Vec::new();
    for i in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{} {}", prefix, i).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

/// A minimal Word package whose body is `body` (WordprocessingML, `w:` prefix).
pub fn docx(body: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let document = format!("<w:document {W_NS}><w:body>{body}</w:body></w:document>");
    let parts: [(&str, &[u8]); 2] = [
        ("[Content_Types].xml", b"<Types/>"),
        ("word/document.xml", document.as_bytes()),
    ];
    for (name, data) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn docx_paragraphs(texts: &[&str]) -> Vec<u8> {
    let body: String = texts
        .iter()
        .map(|t| format!("<w:p><w:r><w:t>{t}</w:t></w:r></w:p>"))
        .collect();
    docx(&body)
}
