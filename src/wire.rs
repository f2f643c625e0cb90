//! Adapters from collaborator payloads to pipeline inputs.
//!
//! The OCR collaborator answers in the Vision `images:annotate` shape and the movie database in the
//! usual paged search shape. Only the fields the pipeline reads are modelled; everything else is
//! ignored.

use serde::Deserialize;

use crate::{CandidateRecord, Error, Result, TextDetection};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OcrPayload {
    Batch { responses: Vec<AnnotateResponse> },
    Single(AnnotateResponse),
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default, rename = "textAnnotations")]
    text_annotations: Vec<TextAnnotation>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default, rename = "boundingPoly")]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

// Vision omits zero coordinates.
#[derive(Debug, Deserialize)]
struct Vertex {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

/// Parses an OCR response into detections, dropping the leading full-text annotation.
pub fn detections_from_json(payload: &str) -> Result<Vec<TextDetection>> {
    let response = match serde_json::from_str(payload)? {
        OcrPayload::Batch { responses } => responses.into_iter().next().ok_or(Error::NoResponses)?,
        OcrPayload::Single(response) => response,
    };

    let detections = response
        .text_annotations
        .into_iter()
        .skip(1)
        .map(|annotation| {
            let vertices = annotation
                .bounding_poly
                .map(|poly| poly.vertices)
                .unwrap_or_default();
            TextDetection::new(
                annotation.description,
                vertices.into_iter().map(|vertex| (vertex.x, vertex.y)),
            )
        })
        .collect::<Vec<_>>();
    log::debug!("Parsed {} detections from OCR payload", detections.len());
    Ok(detections)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CandidateRecord>,
}

/// Parses a movie database search response into candidate records.
pub fn records_from_json(payload: &str) -> Result<Vec<CandidateRecord>> {
    let response: SearchResponse = serde_json::from_str(payload)?;
    Ok(response.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_full_text_annotation() {
        let payload = r#"{
            "responses": [{
                "textAnnotations": [
                    {"description": "UNTIL\nDAWN", "boundingPoly": {"vertices": [{"x": 0, "y": 0}]}},
                    {"description": "UNTIL", "boundingPoly": {"vertices": [
                        {"x": 100, "y": 50}, {"x": 500, "y": 50}, {"x": 500, "y": 150}, {"x": 100, "y": 150}
                    ]}},
                    {"description": "DAWN", "boundingPoly": {"vertices": [
                        {"y": 170}, {"x": 450, "y": 170}, {"x": 450, "y": 270}, {"y": 270}
                    ]}}
                ]
            }]
        }"#;

        let detections = detections_from_json(payload).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "UNTIL");
        assert_eq!(detections[1].quad[0].x, 0.0);
        assert_eq!(detections[1].quad[0].y, 170.0);
    }

    #[test]
    fn accepts_bare_response_and_missing_polygons() {
        let payload = r#"{"textAnnotations": [{"description": "all"}, {"description": "lost"}]}"#;
        let detections = detections_from_json(payload).unwrap();
        assert_eq!(detections.len(), 1);
        assert!(detections[0].quad.is_empty());
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(matches!(
            detections_from_json(r#"{"responses": []}"#),
            Err(Error::NoResponses)
        ));
    }

    #[test]
    fn records_default_optional_fields() {
        let payload = r#"{
            "page": 1,
            "results": [
                {"title": "Inception", "original_title": "Inception", "popularity": 83.2, "vote_count": 36000, "id": 27205},
                {"title": "Inception: The Cobol Job"}
            ]
        }"#;

        let records = records_from_json(payload).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vote_count, Some(36000));
        assert_eq!(records[1].popularity, None);
        assert_eq!(records[1].original_title, None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(records_from_json("{"), Err(Error::Json(_))));
    }
}
