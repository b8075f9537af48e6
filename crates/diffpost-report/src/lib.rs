//! Report assembly and delivery for diffpost.
//!
//! Takes the files the git layer found, annotates their diffs line by line
//! with blame authorship, renders the result as text, JSON or the HTML email
//! body, and sends it to the review team over SMTP.

pub mod annotate;
pub mod html;
pub mod mailer;
pub mod report;
