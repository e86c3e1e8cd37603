use shared::domain::Concept;

/// Reference concepts used to populate an empty store.
pub fn reference_concepts() -> Vec<Concept> {
    vec![
        Concept::new(
            "C001",
            "Hypertension",
            "A condition in which the force of the blood against the artery walls is too high.",
            "High Blood Pressure",
        )
        .with_hierarchy(&["P001", "P002"], &["C002", "C003"]),
        Concept::new(
            "C002",
            "Diabetes Mellitus",
            "A disease that occurs when your blood glucose, also called blood sugar, is too high.",
            "Diabetes",
        )
        .with_hierarchy(&["P003"], &["C004", "C005"]),
        Concept::new(
            "C003",
            "Asthma",
            "A condition in which your airways narrow and swell and may produce extra mucus.",
            "Bronchial Asthma",
        )
        .with_hierarchy(&["P004"], &["C006"]),
        Concept::new(
            "C004",
            "Chronic Kidney Disease",
            "A condition characterized by a gradual loss of kidney function over time.",
            "CKD",
        )
        .with_hierarchy(&["P002"], &["C005", "C006"]),
        Concept::new(
            "C005",
            "Alzheimer's Disease",
            "A progressive disease that destroys memory and other important mental functions.",
            "Alzheimer's",
        )
        .with_hierarchy(&["P005"], &[]),
        Concept::new(
            "C006",
            "Parkinson's Disease",
            "A disorder of the central nervous system that affects movement, often including tremors.",
            "Parkinson's",
        )
        .with_hierarchy(&["P006"], &[]),
        Concept::new(
            "C007",
            "Coronary Artery Disease",
            "A disease caused by the buildup of plaque resulting in the arteries to become hardened and narrowed.",
            "CAD",
        )
        .with_hierarchy(&["P001"], &["C008"]),
        Concept::new(
            "C008",
            "Stroke",
            "Occurs when the blood supply to part of your brain is reduced, preventing brain tissue from getting oxygen.",
            "Cerebrovascular Accident",
        )
        .with_hierarchy(&["P003"], &[]),
        Concept::new(
            "C009",
            "Chronic Obstructive Pulmonary Disease",
            "A group of lung diseases that block airflow and make it difficult to breathe.",
            "COPD",
        )
        .with_hierarchy(&["P004"], &["C010"]),
        Concept::new(
            "C010",
            "Lung Cancer",
            "A type of cancer that begins in the lungs.",
            "Pulmonary Carcinoma",
        )
        .with_hierarchy(&["P007"], &[]),
    ]
}
