use crate::models::ContactRecord;

/// Build a vCard 3.0 text block for the record.
///
/// Optional properties are emitted only when non-empty, in a fixed order.
/// Values are written verbatim: no escaping of `;`, `,` or newlines.
pub fn build(card: &ContactRecord) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", card.full_name),
    ];

    let optional = [
        ("ORG", &card.company),
        ("TITLE", &card.title),
        ("EMAIL;TYPE=INTERNET", &card.email),
        ("TEL;TYPE=CELL", &card.phone),
        ("URL", &card.website),
    ];
    for (property, value) in optional {
        if !value.is_empty() {
            lines.push(format!("{}:{}", property, value));
        }
    }

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}
