//! Birth certificate document content.

use chrono::NaiveDate;

use super::common::{
    capitalize_first, certificate_number, format_generated_date, or_not_available,
};
use super::layout::{Block, Font, Line};
use crate::certificate::models::{present, BirthRecord};

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 12.0;
const NUMBER_SIZE: f32 = 14.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 10.0;

/// Content blocks of the certificate for `submission_id`, in print order.
pub fn certificate_blocks(
    submission_id: i64,
    record: &BirthRecord,
    generated_on: NaiveDate,
) -> Vec<Block> {
    let mut blocks = Vec::new();

    blocks.push(Line::new(Font::Bold, "BIRTH CERTIFICATE", TITLE_SIZE).centered().into());
    blocks.push(Block::move_down(0.5, TITLE_SIZE));
    blocks.push(
        Line::new(Font::Regular, "Government of India", SUBTITLE_SIZE)
            .centered()
            .into(),
    );
    blocks.push(Block::move_down(2.0, SUBTITLE_SIZE));

    blocks.push(
        Line::new(
            Font::Bold,
            format!("Certificate Number: {}", certificate_number(submission_id)),
            NUMBER_SIZE,
        )
        .centered()
        .into(),
    );
    blocks.push(Block::move_down(2.0, NUMBER_SIZE));

    let gender = capitalize_first(&record.gender);
    let full_name = record.full_name();
    section(
        &mut blocks,
        "Personal Information",
        &[
            ("Full Name:", full_name.as_str()),
            ("First Name:", record.first_name.as_str()),
            ("Middle Name:", or_not_available(record.middle_name.as_deref())),
            ("Last Name:", record.last_name.as_str()),
            ("Date of Birth:", record.date_of_birth.as_str()),
            ("Gender:", gender.as_str()),
            ("Time of Birth:", or_not_available(record.time_of_birth.as_deref())),
            ("Place of Birth:", record.place_of_birth.as_str()),
        ],
    );

    section(
        &mut blocks,
        "Father's Information",
        &[
            ("Name:", record.father_name.as_str()),
            ("Aadhaar Number:", record.father_aadhaar_number.as_str()),
        ],
    );

    section(
        &mut blocks,
        "Mother's Information",
        &[
            ("Name:", record.mother_name.as_str()),
            ("Aadhaar Number:", record.mother_aadhaar_number.as_str()),
        ],
    );

    if record.has_official_information() {
        let mut rows = Vec::new();
        if let Some(authority) = present(&record.issuing_authority) {
            rows.push(("Issuing Authority:", authority));
        }
        if let Some(number) = present(&record.registration_number) {
            rows.push(("Registration Number:", number));
        }
        section(&mut blocks, "Official Information", &rows);
    }

    blocks.push(Block::move_down(2.0, BODY_SIZE));
    blocks.push(
        Line::new(
            Font::Regular,
            format!("Generated on: {}", format_generated_date(generated_on)),
            FOOTER_SIZE,
        )
        .centered()
        .into(),
    );
    blocks.push(
        Line::new(
            Font::Regular,
            format!("Certificate ID: {}", submission_id),
            FOOTER_SIZE,
        )
        .centered()
        .into(),
    );

    blocks
}

fn section(blocks: &mut Vec<Block>, heading: &str, rows: &[(&str, &str)]) {
    blocks.push(Line::new(Font::Bold, heading, HEADING_SIZE).underlined().into());
    blocks.push(Block::move_down(0.5, HEADING_SIZE));
    for (label, value) in rows {
        blocks.push(Line::labelled(label, value, BODY_SIZE).into());
    }
    blocks.push(Block::move_down(1.0, BODY_SIZE));
}
