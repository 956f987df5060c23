use serde::{Deserialize, Serialize};

use super::classes::ClassRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPrediction {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f32,
}

/// Resultado completo de una inferencia, ordenado por confianza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence: f32,
    pub all_predictions: Vec<ClassPrediction>,
}

impl PredictionResult {
    /// Empareja cada salida del modelo con su etiqueta y ordena de mayor a menor.
    /// Las confianzas se usan tal cual (sin softmax). Devuelve `None` si no hay salidas.
    pub fn from_scores(scores: &[f32], classes: &ClassRegistry) -> Option<Self> {
        let mut all_predictions: Vec<ClassPrediction> = scores
            .iter()
            .enumerate()
            .map(|(i, &confidence)| ClassPrediction {
                label: classes.label_for(i).into_owned(),
                confidence,
            })
            .collect();

        // sort_by es estable: los empates conservan el orden del registro.
        all_predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let top = all_predictions.first()?.clone();
        Some(Self {
            predicted_class: top.label,
            confidence: top.confidence,
            all_predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClassRegistry {
        ClassRegistry::fallback()
    }

    #[test]
    fn ranks_descending_and_top_matches_head() {
        let res = PredictionResult::from_scores(&[0.1, 0.6, 0.05, 0.25], &registry()).unwrap();
        let labels: Vec<_> = res.all_predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["excelsa", "robusta", "arabica", "liberica"]);
        assert_eq!(res.predicted_class, "excelsa");
        assert_eq!(res.confidence, 0.6);
        let top = ClassPrediction { label: "excelsa".into(), confidence: 0.6 };
        assert_eq!(res.all_predictions[0], top);
    }

    #[test]
    fn ties_keep_registry_order() {
        let res = PredictionResult::from_scores(&[0.25, 0.25, 0.25, 0.25], &registry()).unwrap();
        let labels: Vec<_> = res.all_predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["arabica", "excelsa", "liberica", "robusta"]);

        let res = PredictionResult::from_scores(&[0.1, 0.4, 0.1, 0.4], &registry()).unwrap();
        let labels: Vec<_> = res.all_predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["excelsa", "robusta", "arabica", "liberica"]);
    }

    #[test]
    fn longer_output_gets_positional_labels() {
        let scores = [0.1, 0.1, 0.1, 0.1, 0.5, 0.1];
        let res = PredictionResult::from_scores(&scores, &registry()).unwrap();
        assert_eq!(res.predicted_class, "class_4");
        assert!(res.all_predictions.iter().any(|p| p.label == "class_5"));
        assert_eq!(res.all_predictions.len(), 6);
    }

    #[test]
    fn scores_are_not_renormalized() {
        let res = PredictionResult::from_scores(&[2.0, 3.0], &registry()).unwrap();
        assert_eq!(res.confidence, 3.0);
        assert_eq!(res.all_predictions[1].confidence, 2.0);
    }

    #[test]
    fn empty_output_yields_none() {
        assert!(PredictionResult::from_scores(&[], &registry()).is_none());
    }

    #[test]
    fn serializes_label_as_class() {
        let p = ClassPrediction { label: "robusta".into(), confidence: 0.5 };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["class"], "robusta");
    }
}
