//! Builds a small design, writes it to a graph, reads it back and prints the
//! validation report.

use sbol3::vocab::orientation;
use sbol3::{Cut, Document, Interaction, Participation, Range, SequenceFeature};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seq = "https://example.org/lab/pTet_seq";

    let mut feature = SequenceFeature::new(Some("https://example.org/lab/pTet"))?;
    feature.add_role("https://identifiers.org/SO:0000167")?;

    let mut range = Range::new(Some("promoter"), seq, 1, 55)?;
    range.location_mut().set_orientation(Some(orientation::INLINE))?;
    feature.add_location(range)?;
    // Deliberately reversed so the report has something to say.
    feature.add_location(Range::new(Some("operator"), seq, 40, 20)?)?;
    feature.add_location(Cut::new(Some("nick"), seq, 30)?)?;

    let mut interaction = Interaction::new(
        Some("https://example.org/lab/TetR_represses_pTet"),
        vec!["https://identifiers.org/SBO:0000169".to_string()],
    )?;
    interaction.add_participation(Participation::new(
        Some("repressor"),
        vec!["https://identifiers.org/SBO:0000020".to_string()],
        "https://example.org/lab/TetR",
    )?)?;
    interaction.add_participation(Participation::new(
        Some("promoter"),
        vec!["https://identifiers.org/SBO:0000642".to_string()],
        "https://example.org/lab/pTet",
    )?)?;

    let mut doc = Document::new();
    doc.add(feature)?;
    doc.add(interaction)?;

    let graph = doc.to_graph();
    println!("=== Graph ({} triples) ===", graph.len());
    for triple in graph.triples() {
        println!("{} {} {:?}", triple.subject, triple.predicate, triple.object);
    }

    let read = Document::from_graph(&graph)?;
    let report = read.validate();
    println!("\n=== Validation ({} findings) ===", report.len());
    print!("{}", report);

    Ok(())
}
