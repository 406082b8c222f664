//! Server-side HTML for the single classifier page.

use crate::{
    ClassifyError,
    classifier::{ClassificationResult, ProbabilityRow},
    intake::UploadedImage,
    session::{Outcome, Session, SessionState},
};
use std::fmt::Write;

pub const NO_IMAGE_WARNING: &str = "Por favor sube una imagen primero.";
pub const NO_PROBABILITIES_INFO: &str = "No se devolvieron probabilidades detalladas desde la API.";
pub const START_HINT: &str = "Sube una imagen para comenzar el análisis.";
pub const BUSY_INFO: &str = "Analizando imagen con la red neuronal...";

const STYLE: &str = r#"
    body { margin: 0; background-color: #e8f1fb; font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; color: #1f2937; }
    .container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
    .title { text-align: center; color: #0a4da3; font-weight: 900; font-size: 42px; margin-bottom: -5px; }
    .subtitle { text-align: center; color: #4a6fa1; font-size: 18px; }
    .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
    .card { background-color: rgba(255, 255, 255, 0.85); padding: 22px; border-radius: 16px; box-shadow: 0px 6px 18px rgba(0,0,0,0.10); border: 1px solid #d3e2f4; margin-top: 20px; }
    .badge { background-color: #3b82f6; padding: 8px 14px; border-radius: 10px; color: white; font-weight: 700; display: inline-block; }
    .confidence b { color: #0a4da3; }
    button { background-color: #3b82f6; color: white; padding: 0.6rem 1rem; border-radius: 10px; border: none; font-size: 1rem; font-weight: 600; cursor: pointer; }
    button:hover { background-color: #2563eb; }
    button.wide { width: 100%; }
    button.secondary { background-color: #94a3b8; }
    .notice { padding: 12px 16px; border-radius: 10px; margin: 12px 0; }
    .notice.info { background: #dbeafe; color: #1e3a8a; }
    .notice.warning { background: #fef3c7; color: #92400e; }
    .notice.error { background: #fee2e2; color: #991b1b; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #d3e2f4; }
    .chart .row { display: grid; grid-template-columns: 140px 1fr 70px; align-items: center; gap: 8px; margin: 6px 0; }
    .chart .track { background: #e5edf7; border-radius: 6px; height: 18px; }
    .chart .bar { background: #3b82f6; border-radius: 6px; height: 18px; }
    .preview img { max-width: 100%; border-radius: 8px; }
    .caption { color: #64748b; font-size: 0.9rem; }
"#;

pub fn page(session: &Session) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MRI Tumor Classifier</title>
    <style>{STYLE}</style>
</head>
<body>
<div class="container">
    <h1 class="title">🧠 MRI Tumor Classifier</h1>
    <p class="subtitle">Clasificación inteligente de tumores en imágenes MRI — Modelo CNN</p>
    <div class="columns">
        <div class="card">{intake}</div>
        <div class="card">{diagnosis}</div>
    </div>
    {hint}
</div>
</body>
</html>
"#,
        intake = intake_panel(session),
        diagnosis = diagnosis_panel(session),
        hint = if session.image().is_none() {
            notice("info", START_HINT)
        } else {
            String::new()
        },
    );
    html
}

fn intake_panel(session: &Session) -> String {
    let mut html = String::from(
        r#"<h2>📤 Selecciona una imagen MRI</h2>
<form method="post" action="/upload" enctype="multipart/form-data">
    <input type="file" name="file" accept=".jpg,.jpeg,.png,image/jpeg,image/png" required>
    <button type="submit">Cargar imagen</button>
</form>
<p class="caption">Formatos: JPG, PNG</p>
"#,
    );

    if let Some(error) = session.upload_error() {
        html.push_str(&notice("error", &error.to_string()));
    }

    if let Some(image) = session.image() {
        html.push_str(&preview(image));
        html.push_str(
            r#"<form method="post" action="/clear"><button type="submit" class="secondary">Quitar imagen</button></form>"#,
        );
    }

    html
}

fn preview(image: &UploadedImage) -> String {
    format!(
        r#"<figure class="preview"><img src="{src}" alt="Imagen cargada"><figcaption class="caption">Imagen cargada: {name} ({w}×{h})</figcaption></figure>"#,
        src = image.preview,
        name = escape(&image.filename),
        w = image.width,
        h = image.height,
    )
}

fn diagnosis_panel(session: &Session) -> String {
    let mut html = String::from(
        r#"<h2>🔍 Procesamiento y diagnóstico</h2>
<form method="post" action="/classify"><button type="submit" class="wide">Realizar diagnóstico</button></form>
"#,
    );

    if session.state() == SessionState::Classifying {
        html.push_str(&notice("info", BUSY_INFO));
        return html;
    }

    match session.outcome() {
        None => {}
        Some(Outcome::NoImage) => html.push_str(&notice("warning", NO_IMAGE_WARNING)),
        Some(Outcome::Failed(error)) => html.push_str(&failure(error)),
        Some(Outcome::Classified(result)) => html.push_str(&result_section(result)),
    }

    if let Some(at) = session.classified_at() {
        let _ = write!(
            html,
            r#"<p class="caption">Diagnóstico realizado: {}</p>"#,
            at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    html
}

fn failure(error: &ClassifyError) -> String {
    notice("error", &error.to_string())
}

pub fn result_section(result: &ClassificationResult) -> String {
    let mut html = format!(
        r#"<div class="badge">{label}</div>
<p class="confidence"><strong>Confianza:</strong> <b>{confidence}</b></p>
<hr>
"#,
        label = escape(&result.prediction),
        confidence = result.confidence_text(),
    );

    match &result.probabilities {
        Some(rows) => {
            html.push_str("<h3>📊 Probabilidades por clase</h3>\n");
            html.push_str(&probability_table(rows));
            html.push_str("<h3>📈 Distribución</h3>\n");
            html.push_str(&bar_chart(rows));
        }
        None => html.push_str(&notice("info", NO_PROBABILITIES_INFO)),
    }

    html
}

fn probability_table(rows: &[ProbabilityRow]) -> String {
    let mut html = String::from(
        "<table class=\"probabilities\">\n<thead><tr><th>Clase</th><th>Probabilidad (%)</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&row.class),
            row.percentage_text()
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn bar_chart(rows: &[ProbabilityRow]) -> String {
    let mut html = String::from("<div class=\"chart\">\n");
    for row in rows {
        let width = row.percentage.clamp(0.0, 100.0);
        let _ = writeln!(
            html,
            r#"<div class="row"><span>{class}</span><div class="track"><div class="bar" style="width: {width:.2}%"></div></div><span>{pct}%</span></div>"#,
            class = escape(&row.class),
            pct = row.percentage_text(),
        );
    }
    html.push_str("</div>\n");
    html
}

fn notice(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="notice {kind}">{}</div>"#,
        escape(message)
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
