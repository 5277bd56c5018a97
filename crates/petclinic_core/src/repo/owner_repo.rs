//! Owner store contract and SQLite implementation.
//!
//! # Responsibility
//! - Load an owner together with its pets, pet types and visits.
//! - Persist an owner aggregate in one transaction.
//! - Expose the pet-type catalogue for form rendering.
//!
//! # Invariants
//! - `save` validates the owner before any SQL mutation.
//! - Storage-assigned ids are written back only after commit.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::owner::{Owner, OwnerId, OwnerValidationError};
use crate::model::pet::{Pet, PetId, PetType, PetTypeId, Visit, VisitId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for owner persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(OwnerValidationError),
    Db(DbError),
    NotFound(OwnerId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "owner not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted owner data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<OwnerValidationError> for RepoError {
    fn from(value: OwnerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Owner store consumed by the pet lookup and workflow services.
pub trait OwnerRepository {
    /// Loads one owner with its pets; `None` when no such owner exists.
    fn find_by_id(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    /// Inserts or updates the owner aggregate and assigns ids to new rows.
    fn save(&self, owner: &mut Owner) -> RepoResult<()>;
    /// Returns every known pet type sorted by name.
    fn find_pet_types(&self) -> RepoResult<Vec<PetType>>;
}

impl<R: OwnerRepository + ?Sized> OwnerRepository for &R {
    fn find_by_id(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        (**self).find_by_id(id)
    }

    fn save(&self, owner: &mut Owner) -> RepoResult<()> {
        (**self).save(owner)
    }

    fn find_pet_types(&self) -> RepoResult<Vec<PetType>> {
        (**self).find_pet_types()
    }
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

/// Ids assigned during one `save`, applied to the aggregate after commit.
#[derive(Default)]
struct AssignedIds {
    owner: Option<OwnerId>,
    pets: Vec<(usize, PetId)>,
    visits: Vec<(usize, usize, VisitId)>,
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn find_by_id(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        let owner = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, address, city, telephone
                 FROM owners
                 WHERE id = ?1;",
                [id],
                |row| {
                    let mut owner = Owner::new(
                        row.get::<_, String>("first_name")?,
                        row.get::<_, String>("last_name")?,
                        row.get::<_, String>("address")?,
                        row.get::<_, String>("city")?,
                        row.get::<_, String>("telephone")?,
                    );
                    owner.id = Some(row.get("id")?);
                    Ok(owner)
                },
            )
            .optional()?;

        let Some(mut owner) = owner else {
            return Ok(None);
        };

        for pet in self.load_pets(id)? {
            owner.add_pet(pet);
        }
        Ok(Some(owner))
    }

    fn save(&self, owner: &mut Owner) -> RepoResult<()> {
        owner.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let mut assigned = AssignedIds::default();

        let owner_id = match owner.id {
            Some(id) => {
                let changed = tx.execute(
                    "UPDATE owners
                     SET first_name = ?1, last_name = ?2, address = ?3, city = ?4, telephone = ?5
                     WHERE id = ?6;",
                    params![
                        owner.first_name,
                        owner.last_name,
                        owner.address,
                        owner.city,
                        owner.telephone,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(id));
                }
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO owners (first_name, last_name, address, city, telephone)
                     VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        owner.first_name,
                        owner.last_name,
                        owner.address,
                        owner.city,
                        owner.telephone,
                    ],
                )?;
                let id = tx.last_insert_rowid();
                assigned.owner = Some(id);
                id
            }
        };

        for (pet_index, pet) in owner.pets().iter().enumerate() {
            let type_id = resolve_type_id(&tx, pet.pet_type.as_ref())?;
            let birth_date = pet.birth_date.map(format_storage_date);

            let pet_id = match pet.id {
                Some(pet_id) => {
                    let changed = tx.execute(
                        "UPDATE pets
                         SET name = ?1, birth_date = ?2, type_id = ?3
                         WHERE id = ?4 AND owner_id = ?5;",
                        params![pet.name, birth_date, type_id, pet_id, owner_id],
                    )?;
                    if changed == 0 {
                        return Err(RepoError::InvalidData(format!(
                            "pet {pet_id} does not belong to owner {owner_id}"
                        )));
                    }
                    pet_id
                }
                None => {
                    tx.execute(
                        "INSERT INTO pets (name, birth_date, type_id, owner_id)
                         VALUES (?1, ?2, ?3, ?4);",
                        params![pet.name, birth_date, type_id, owner_id],
                    )?;
                    let pet_id = tx.last_insert_rowid();
                    assigned.pets.push((pet_index, pet_id));
                    pet_id
                }
            };

            // Visits are append-only: only unsaved ones are written.
            for (visit_index, visit) in pet.visits.iter().enumerate() {
                if !visit.is_new() {
                    continue;
                }
                tx.execute(
                    "INSERT INTO visits (pet_id, visit_date, description)
                     VALUES (?1, ?2, ?3);",
                    params![pet_id, format_storage_date(visit.date), visit.description],
                )?;
                assigned
                    .visits
                    .push((pet_index, visit_index, tx.last_insert_rowid()));
            }
        }

        tx.commit()?;

        if let Some(id) = assigned.owner {
            owner.id = Some(id);
        }
        let pets = owner.pets_mut();
        for (pet_index, pet_id) in assigned.pets {
            pets[pet_index].id = Some(pet_id);
        }
        for (pet_index, visit_index, visit_id) in assigned.visits {
            pets[pet_index].visits[visit_index].id = Some(visit_id);
        }

        Ok(())
    }

    fn find_pet_types(&self) -> RepoResult<Vec<PetType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM types ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut types = Vec::new();
        while let Some(row) = rows.next()? {
            types.push(PetType::with_id(row.get("id")?, row.get::<_, String>("name")?));
        }
        Ok(types)
    }
}

impl SqliteOwnerRepository<'_> {
    fn load_pets(&self, owner_id: OwnerId) -> RepoResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name, p.birth_date, t.id AS type_id, t.name AS type_name
             FROM pets p
             LEFT JOIN types t ON t.id = p.type_id
             WHERE p.owner_id = ?1
             ORDER BY p.id ASC;",
        )?;
        let mut rows = stmt.query([owner_id])?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            let pet_id: PetId = row.get("id")?;
            let birth_date = match row.get::<_, Option<String>>("birth_date")? {
                Some(text) => Some(parse_storage_date(&text, "pets.birth_date")?),
                None => None,
            };
            let pet_type = match (
                row.get::<_, Option<PetTypeId>>("type_id")?,
                row.get::<_, Option<String>>("type_name")?,
            ) {
                (Some(type_id), Some(name)) => Some(PetType::with_id(type_id, name)),
                (None, None) => None,
                _ => {
                    return Err(RepoError::InvalidData(format!(
                        "pet {pet_id} references a missing type"
                    )));
                }
            };

            pets.push(Pet {
                id: Some(pet_id),
                name: row.get("name")?,
                birth_date,
                pet_type,
                visits: Vec::new(),
            });
        }

        for pet in &mut pets {
            if let Some(pet_id) = pet.id {
                pet.visits = self.load_visits(pet_id)?;
            }
        }

        Ok(pets)
    }

    fn load_visits(&self, pet_id: PetId) -> RepoResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, visit_date, description
             FROM visits
             WHERE pet_id = ?1
             ORDER BY visit_date ASC, id ASC;",
        )?;
        let mut rows = stmt.query([pet_id])?;
        let mut visits = Vec::new();

        while let Some(row) = rows.next()? {
            let date_text: String = row.get("visit_date")?;
            let mut visit = Visit::on(
                parse_storage_date(&date_text, "visits.visit_date")?,
                row.get::<_, String>("description")?,
            );
            visit.id = Some(row.get("id")?);
            visits.push(visit);
        }

        Ok(visits)
    }
}

fn resolve_type_id(conn: &Connection, pet_type: Option<&PetType>) -> RepoResult<Option<PetTypeId>> {
    let Some(pet_type) = pet_type else {
        return Ok(None);
    };
    if let Some(id) = pet_type.id {
        return Ok(Some(id));
    }

    let existing = conn
        .query_row(
            "SELECT id FROM types WHERE name = ?1;",
            [pet_type.name.as_str()],
            |row| row.get::<_, PetTypeId>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(Some(id));
    }

    conn.execute(
        "INSERT INTO types (name) VALUES (?1);",
        [pet_type.name.as_str()],
    )?;
    Ok(Some(conn.last_insert_rowid()))
}

fn format_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

fn parse_storage_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, STORAGE_DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}
