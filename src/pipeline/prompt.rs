// src/pipeline/prompt.rs

//! Analysis prompt construction.

use crate::models::SuspiciousEntry;

const INSTRUCTIONS: &str = "\
Actúa como un experto en Seguridad en la Nube. He detectado actividad sospechosa en los logs de mi portafolio.
Analiza estos eventos y dime:
1. ¿Qué tipo de ataque o escaneo están intentando? (Ej: Directory Traversal, Brute Force, etc.)
2. Identifica la IP más agresiva.
3. Dame una recomendación técnica para mi WAF o configuración de servidor.

LOGS A ANALIZAR:
";

/// Join the first `limit` entries, one per line, in file order.
pub fn sample(entries: &[SuspiciousEntry], limit: usize) -> String {
    entries
        .iter()
        .take(limit)
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a sample of the entries in the analysis instructions.
pub fn build_prompt(entries: &[SuspiciousEntry], limit: usize) -> String {
    format!("{}{}\n", INSTRUCTIONS, sample(entries, limit))
}
