use chrono::{Local, NaiveDate};
use petclinic_core::db::open_db_in_memory;
use petclinic_core::form::errors::{DUPLICATE_CODE, NAME_FIELD, REQUIRED_CODE};
use petclinic_core::{
    FormOutcome, Owner, OwnerId, OwnerRepository, Pet, PetLookupService, PetServiceError,
    PetType, PetValidator, PetWorkflow, RenderContext, RepoError, RepoResult,
    SqliteOwnerRepository, ValidationResult, REDIRECT_OWNER_DETAILS,
    VIEW_PETS_CREATE_OR_UPDATE_FORM,
};
use std::cell::RefCell;

#[derive(Default)]
struct RecordingOwnerRepository {
    saved: RefCell<Vec<Owner>>,
    fail_saves: bool,
}

impl OwnerRepository for RecordingOwnerRepository {
    fn find_by_id(&self, _id: OwnerId) -> RepoResult<Option<Owner>> {
        Ok(None)
    }

    fn save(&self, owner: &mut Owner) -> RepoResult<()> {
        if self.fail_saves {
            return Err(RepoError::InvalidData("store offline".to_string()));
        }
        self.saved.borrow_mut().push(owner.clone());
        Ok(())
    }

    fn find_pet_types(&self) -> RepoResult<Vec<PetType>> {
        Ok(Vec::new())
    }
}

fn shaggy() -> Owner {
    let mut owner = Owner::new(
        "Shaggy",
        "Rogers",
        "Mystery, Inc.",
        "Crystal Cove",
        "1239875670",
    );
    owner.id = Some(1);
    owner
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn pet(name: &str, type_name: &str) -> Pet {
    Pet {
        name: name.to_string(),
        birth_date: Some(today()),
        pet_type: Some(PetType::new(type_name)),
        ..Pet::new()
    }
}

fn saved_pet(id: i64, name: &str) -> Pet {
    Pet {
        id: Some(id),
        ..pet(name, "dog")
    }
}

#[test]
fn init_creation_form_offers_transient_pet() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let owner = shaggy();
    let mut context = RenderContext::new();

    let outcome = workflow.init_creation_form(&owner, &mut context);

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert_eq!(outcome.view_name(), VIEW_PETS_CREATE_OR_UPDATE_FORM);
    assert!(context.pet().unwrap().is_new());
    assert_eq!(context.owner(), Some(&owner));
    assert!(owner.pets().is_empty());
}

#[test]
fn creation_attaches_pet_and_redirects() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let candidate = pet("Scooby Doo", "dog");

    let outcome =
        workflow.process_creation_form(&mut owner, candidate.clone(), &mut result, &mut context);

    assert_eq!(outcome.view_name(), REDIRECT_OWNER_DETAILS);
    assert!(!result.has_errors());
    assert_eq!(owner.pets(), &[candidate][..]);
    assert!(repo.saved.borrow().is_empty());
}

#[test]
fn creation_rejects_duplicate_name_in_any_case() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);

    for variant in ["Scooby Doo", "scooby doo", "SCOOBY DOO", "sCoObY dOo"] {
        let mut owner = shaggy();
        let mut context = RenderContext::new();
        let mut first_result = ValidationResult::new();
        let first = workflow.process_creation_form(
            &mut owner,
            pet("Scooby Doo", "dog"),
            &mut first_result,
            &mut context,
        );
        assert_eq!(first, FormOutcome::RedirectToOwner);

        let mut result = ValidationResult::new();
        let second_candidate = pet(variant, "bird");
        let second = workflow.process_creation_form(
            &mut owner,
            second_candidate.clone(),
            &mut result,
            &mut context,
        );

        assert_eq!(second, FormOutcome::ShowForm, "variant {variant}");
        assert_eq!(result.error_count(), 1);
        let error = result.field_error(NAME_FIELD).unwrap();
        assert_eq!(error.code, DUPLICATE_CODE);
        assert_eq!(error.message, "already exists");
        assert_eq!(owner.pets().len(), 1);
        assert_eq!(context.pet(), Some(&second_candidate));
    }
}

#[test]
fn creation_does_not_trim_names_before_comparing() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Rex"));
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();

    let outcome =
        workflow.process_creation_form(&mut owner, pet(" Rex", "cat"), &mut result, &mut context);

    assert_eq!(outcome, FormOutcome::RedirectToOwner);
    assert_eq!(owner.pets().len(), 2);
}

#[test]
fn creation_redisplays_on_upstream_errors_without_attaching() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let candidate = Pet {
        birth_date: None,
        ..pet("Fluffy", "cat")
    };
    PetValidator::new().validate(&candidate, &mut result);

    let outcome =
        workflow.process_creation_form(&mut owner, candidate, &mut result, &mut context);

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert_eq!(result.error_count(), 1);
    assert!(owner.pets().is_empty());
    assert_eq!(context.pet().unwrap().name, "Fluffy");
}

#[test]
fn creation_skips_duplicate_check_for_blank_name() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(Pet {
        id: Some(1),
        name: String::new(),
        ..Pet::new()
    });
    let candidate = pet("", "dog");
    let mut result = ValidationResult::new();
    PetValidator::new().validate(&candidate, &mut result);
    let mut context = RenderContext::new();

    let outcome =
        workflow.process_creation_form(&mut owner, candidate, &mut result, &mut context);

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.field_error(NAME_FIELD).unwrap().code, REQUIRED_CODE);
}

#[test]
fn init_update_form_places_existing_pet() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Scooby Doo"));
    let mut context = RenderContext::new();

    let outcome = workflow.init_update_form(&owner, 1, &mut context).unwrap();

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert_eq!(context.pet(), owner.pet(1));
    assert_eq!(context.owner(), Some(&owner));
}

#[test]
fn init_update_form_for_unknown_pet_is_not_found() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let owner = shaggy();
    let mut context = RenderContext::new();

    let err = workflow.init_update_form(&owner, 42, &mut context).unwrap_err();

    assert!(matches!(
        err,
        PetServiceError::PetNotFound {
            owner_id: Some(1),
            pet_id: 42
        }
    ));
    assert_eq!(err.to_string(), "Pet ID not found: 42");
    assert!(context.is_empty());
}

#[test]
fn update_with_unchanged_name_is_not_a_duplicate() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Scooby Doo"));
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let edited = Pet {
        birth_date: NaiveDate::from_ymd_opt(2019, 5, 1),
        ..saved_pet(1, "Scooby Doo")
    };

    let outcome = workflow
        .process_update_form(edited, &mut result, &mut owner, &mut context)
        .unwrap();

    assert_eq!(outcome, FormOutcome::RedirectToOwner);
    assert!(!result.has_errors());
    assert_eq!(owner.pets().len(), 1);
    assert_eq!(owner.pet(1).unwrap().birth_date, NaiveDate::from_ymd_opt(2019, 5, 1));
    assert_eq!(repo.saved.borrow().len(), 1);
}

#[test]
fn update_may_change_case_of_own_name() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Scooby Doo"));
    owner.add_pet(saved_pet(2, "Scrappy"));
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();

    let outcome = workflow
        .process_update_form(saved_pet(1, "SCOOBY DOO"), &mut result, &mut owner, &mut context)
        .unwrap();

    assert_eq!(outcome, FormOutcome::RedirectToOwner);
    assert_eq!(owner.pet(1).unwrap().name, "SCOOBY DOO");
}

#[test]
fn update_rename_to_sibling_name_is_rejected() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Scooby Doo"));
    owner.add_pet(saved_pet(2, "Scrappy"));
    let before = owner.clone();
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let renamed = saved_pet(2, "scooby doo");

    let outcome = workflow
        .process_update_form(renamed.clone(), &mut result, &mut owner, &mut context)
        .unwrap();

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert!(result.has_field_errors(NAME_FIELD));
    assert_eq!(owner, before);
    assert!(repo.saved.borrow().is_empty());
    assert_eq!(context.pet(), Some(&renamed));
}

#[test]
fn update_of_unsaved_candidate_matching_existing_name_is_rejected() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Scooby Doo"));
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();

    let outcome = workflow
        .process_update_form(pet("Scooby Doo", "lizard"), &mut result, &mut owner, &mut context)
        .unwrap();

    assert_eq!(outcome, FormOutcome::ShowForm);
    assert!(result.has_errors());
    assert_eq!(owner.pets().len(), 1);
    assert!(repo.saved.borrow().is_empty());
}

#[test]
fn update_of_unattached_pet_attaches_and_saves_owner() {
    let repo = RecordingOwnerRepository::default();
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let candidate = Pet {
        name: "Scooby Doo".to_string(),
        ..Pet::new()
    };

    let outcome = workflow
        .process_update_form(candidate.clone(), &mut result, &mut owner, &mut context)
        .unwrap();

    assert_eq!(outcome, FormOutcome::RedirectToOwner);
    assert_eq!(owner.pets(), &[candidate][..]);
    let saved = repo.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0], owner);
}

#[test]
fn update_propagates_store_failures() {
    let repo = RecordingOwnerRepository {
        fail_saves: true,
        ..RecordingOwnerRepository::default()
    };
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    owner.add_pet(saved_pet(1, "Rex"));
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();

    let err = workflow
        .process_update_form(saved_pet(1, "Rexy"), &mut result, &mut owner, &mut context)
        .unwrap_err();

    assert!(matches!(err, PetServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(owner.pets().len(), 1);
    assert_eq!(owner.pets()[0].name, "Rex");
}

#[test]
fn failed_update_save_does_not_attach_new_pet() {
    let repo = RecordingOwnerRepository {
        fail_saves: true,
        ..RecordingOwnerRepository::default()
    };
    let workflow = PetWorkflow::new(&repo);
    let mut owner = shaggy();
    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();

    let outcome =
        workflow.process_update_form(pet("Rex", "dog"), &mut result, &mut owner, &mut context);

    assert!(outcome.is_err());
    assert!(owner.pets().is_empty());
    assert!(repo.saved.borrow().is_empty());
}

#[test]
fn sqlite_create_then_duplicate_scenario() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::new(&conn);
    let mut seed = Owner::new("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023");
    repo.save(&mut seed).unwrap();
    assert_eq!(seed.id, Some(1));

    let lookup = PetLookupService::new(&repo);
    let workflow = PetWorkflow::new(&repo);
    let mut owner = lookup.find_owner(1).unwrap();
    assert!(owner.pets().is_empty());

    let mut context = RenderContext::new();
    let mut result = ValidationResult::new();
    let created =
        workflow.process_creation_form(&mut owner, pet("Rex", "dog"), &mut result, &mut context);
    assert_eq!(created, FormOutcome::RedirectToOwner);
    assert_eq!(owner.pets().len(), 1);
    assert_eq!(owner.pets()[0].name, "Rex");

    let mut result = ValidationResult::new();
    let duplicate =
        workflow.process_creation_form(&mut owner, pet("rEX", "cat"), &mut result, &mut context);
    assert_eq!(duplicate, FormOutcome::ShowForm);
    assert_eq!(result.error_count(), 1);
    assert!(result.has_field_errors(NAME_FIELD));
    assert_eq!(owner.pets().len(), 1);
}

#[test]
fn sqlite_update_persists_renamed_pet() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteOwnerRepository::new(&conn);
    let mut seed = Owner::new("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749");
    seed.add_pet(pet("Basil", "hamster"));
    repo.save(&mut seed).unwrap();
    let owner_id = seed.id.unwrap();
    let pet_id = seed.pets()[0].id.unwrap();

    let lookup = PetLookupService::new(&repo);
    let workflow = PetWorkflow::new(&repo);
    let mut owner = lookup.find_owner(owner_id).unwrap();
    let mut edited = lookup.find_pet(owner_id, Some(pet_id)).unwrap();
    edited.name = "Basil II".to_string();

    let mut result = ValidationResult::new();
    let mut context = RenderContext::new();
    let outcome = workflow
        .process_update_form(edited, &mut result, &mut owner, &mut context)
        .unwrap();
    assert_eq!(outcome, FormOutcome::RedirectToOwner);

    let reloaded = lookup.find_owner(owner_id).unwrap();
    assert_eq!(reloaded.pets().len(), 1);
    assert_eq!(reloaded.pet(pet_id).unwrap().name, "Basil II");
    assert_eq!(reloaded.pet(pet_id).unwrap().pet_type.as_ref().unwrap().name, "hamster");
}
