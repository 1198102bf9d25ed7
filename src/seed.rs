//! Showcase projects inserted into an empty catalog on first startup.

use chrono::{DateTime, Duration, Utc};

use crate::models::project::NewProject;

/// One showcase entry.
#[derive(Clone, Copy, Debug)]
pub struct SeedProject {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub location: &'static str,
    pub image_url: &'static str,
    pub description: &'static str,
}

pub const SEED_PROJECTS: &[SeedProject] = &[
    SeedProject {
        id: "1",
        title: "Toiture Mont-Royal",
        category: "Toiture",
        location: "Montréal, QC",
        image_url: "https://images.unsplash.com/photo-1503387762-592deb58ef4e?q=80&w=1600&auto=format&fit=crop",
        description: "Réfection complète avec membrane élastomère et isolation améliorée.",
    },
    SeedProject {
        id: "2",
        title: "Façade Contemporaine",
        category: "Revêtement Extérieur",
        location: "Brossard, QC",
        image_url: "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?q=80&w=1600&auto=format&fit=crop",
        description: "Revêtement CanExel + aluminium noir, soffites ventilés et éclairage encastré.",
    },
    SeedProject {
        id: "3",
        title: "Sous-sol Signature",
        category: "Finition de Sous-sol",
        location: "Laval, QC",
        image_url: "https://images.unsplash.com/photo-1512914890250-353c97c9e7e2?q=80&w=1600&auto=format&fit=crop",
        description: "Cinéma maison, cave à vin vitrée et bureau insonorisé.",
    },
    SeedProject {
        id: "4",
        title: "Salle de Bain Spa",
        category: "Salle de Bain",
        location: "Longueuil, QC",
        image_url: "https://images.unsplash.com/photo-1584622650111-993a426fbf0a?q=80&w=1600&auto=format&fit=crop",
        description: "Douche italienne, bain autoportant et céramique chauffante grand format.",
    },
    SeedProject {
        id: "5",
        title: "Garage Atelier",
        category: "Construction de Garage",
        location: "Terrebonne, QC",
        image_url: "https://images.unsplash.com/photo-1563274640-e220a0614f16?q=80&w=1600&auto=format&fit=crop",
        description: "Garage double détaché avec mezzanine et plancher époxy.",
    },
    SeedProject {
        id: "6",
        title: "Patio Niveau",
        category: "Patio & Terrasses",
        location: "Saint-Lambert, QC",
        image_url: "https://images.unsplash.com/photo-1595846519845-68e298c2edd8?q=80&w=1600&auto=format&fit=crop",
        description: "Terrasse multi-niveaux en composite, garde-corps verre et cuisine extérieure.",
    },
    SeedProject {
        id: "7",
        title: "Vitrines Sur Rue",
        category: "Rénovation Commerciale",
        location: "Plateau Mont-Royal, QC",
        image_url: "https://images.unsplash.com/photo-1497366811353-6870744d04b2?q=80&w=1600&auto=format&fit=crop",
        description: "Réaménagement complet de boutique : façade vitrée, éclairage accent et mobilier sur mesure.",
    },
    SeedProject {
        id: "8",
        title: "Portes & Fenêtres Noir Mat",
        category: "Portes et Fenêtres",
        location: "Outremont, QC",
        image_url: "https://images.unsplash.com/photo-1506180370005-559ccb7a69bc?q=80&w=1600&auto=format&fit=crop",
        description: "Remplacement complet par aluminium noir thermos double Low-E, seuils scellés et calfeutrage pro.",
    },
];

/// Materialize the seed set. Timestamps step back one millisecond per entry
/// so the listing shows the entries in the order declared above.
pub fn seed_projects(now: DateTime<Utc>) -> Vec<NewProject> {
    SEED_PROJECTS
        .iter()
        .enumerate()
        .map(|(i, seed)| NewProject {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            category: seed.category.to_string(),
            location: seed.location.to_string(),
            description: seed.description.to_string(),
            image_url: seed.image_url.to_string(),
            images: Vec::new(),
            created_at: now - Duration::milliseconds(i as i64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_rows_are_ordered_newest_first() {
        let now = Utc::now();
        let rows = seed_projects(now);

        assert_eq!(rows.len(), SEED_PROJECTS.len());
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].title, "Toiture Mont-Royal");
        assert_eq!(rows[0].created_at, now);
        assert!(rows.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert!(rows.iter().all(|r| r.image_url.starts_with("https://") && r.images.is_empty()));
    }
}
