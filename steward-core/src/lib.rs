// steward-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrats de persistance des collections (règles, mappings).
pub mod ports;

// 2. Domain (Cœur du métier)
// Parsing DDL/DBT, génération et validation des règles DQC.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Fichiers délimités par '~', configuration YAML, écriture atomique.
pub mod infrastructure;

// 4. Application (Use Cases)
// Sessions de règles et de mappings, rapport de lignage.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use steward_core::StewardError;
pub use error::StewardError;
