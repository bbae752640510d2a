use actix_web::{
    web::{self, Json, Path},
    HttpResponse, Responder,
};

use crate::models::{Building, Owner, Room};
use crate::properties::models::{CreateBuildingRequest, CreateOwnerRequest, CreateRoomRequest};
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    post,
    path = "/owners",
    request_body = CreateOwnerRequest,
    responses(
        (status = 201, description = "Owner created", body = Owner)
    )
)]
pub async fn create_owner(
    req: Json<CreateOwnerRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let owner = data.db.insert_owner(Owner {
        id: 0,
        name: req.name,
        address: req.address,
        phone: req.phone,
        email: req.email,
        notes: req.notes,
    });
    HttpResponse::Created().json(owner)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    get,
    path = "/owners/{id}",
    responses(
        (status = 200, description = "Owner found", body = Owner),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Owner id"))
)]
pub async fn get_owner(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_owner(id.into_inner()) {
        Some(owner) => HttpResponse::Ok().json(owner),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Owner not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    post,
    path = "/buildings",
    request_body = CreateBuildingRequest,
    responses(
        (status = 201, description = "Building created", body = Building),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    )
)]
pub async fn create_building(
    req: Json<CreateBuildingRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    if data.db.get_owner(req.owner_id).is_none() {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Owner not found"));
    }
    let building = data.db.insert_building(Building {
        id: 0,
        name: req.name,
        address: req.address,
        structure: req.structure,
        roof_structure: req.roof_structure,
        floors: req.floors,
        total_units: req.total_units,
        building_type: req.building_type,
        construction_date: req.construction_date,
        owner_id: req.owner_id,
        notes: req.notes,
    });
    HttpResponse::Created().json(building)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    get,
    path = "/buildings/{id}",
    responses(
        (status = 200, description = "Building found", body = Building),
        (status = 404, description = "Building not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Building id"))
)]
pub async fn get_building(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_building(id.into_inner()) {
        Some(building) => HttpResponse::Ok().json(building),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Building not found")),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    post,
    path = "/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 404, description = "Building not found", body = ErrorResponse)
    )
)]
pub async fn create_room(
    req: Json<CreateRoomRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    if data.db.get_building(req.building_id).is_none() {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Building not found"));
    }

    // Store the custom amenity list as its JSON serialization; the pipeline
    // parses it back when resolving the contract.
    let custom_amenities = match req.custom_amenities {
        Some(list) if !list.is_empty() => match serde_json::to_string(&list) {
            Ok(json) => Some(json),
            Err(err) => {
                log::error!("failed to serialize custom amenities: {err}");
                None
            }
        },
        _ => None,
    };

    let room = data.db.insert_room(Room {
        id: 0,
        room_number: req.room_number,
        layout: req.layout,
        floor_area: req.floor_area,
        floor: req.floor,
        has_kitchen: req.has_kitchen,
        has_toilet: req.has_toilet,
        has_bath: req.has_bath,
        has_shower: req.has_shower,
        has_washroom: req.has_washroom,
        has_hot_water: req.has_hot_water,
        has_stove: req.has_stove,
        has_air_conditioner: req.has_air_conditioner,
        has_lighting: req.has_lighting,
        has_telephone: req.has_telephone,
        has_internet: req.has_internet,
        has_fire_alarm: req.has_fire_alarm,
        has_tv_connection: req.has_tv_connection,
        has_elevator_access: req.has_elevator_access,
        has_parking: req.has_parking,
        has_bicycle_parking: req.has_bicycle_parking,
        has_private_garden: req.has_private_garden,
        custom_amenities,
        building_id: req.building_id,
        notes: req.notes,
    });
    HttpResponse::Created().json(room)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Property Master Data",
    get,
    path = "/rooms/{id}",
    responses(
        (status = 200, description = "Room found", body = Room),
        (status = 404, description = "Room not found", body = ErrorResponse)
    ),
    params(("id" = i64, Path, description = "Room id"))
)]
pub async fn get_room(id: Path<i64>, data: web::Data<AppState>) -> impl Responder {
    match data.db.get_room(id.into_inner()) {
        Some(room) => HttpResponse::Ok().json(room),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Room not found")),
    }
}
