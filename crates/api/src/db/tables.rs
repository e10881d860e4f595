//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Phone,
    Role,
    CompanyId,
    PasswordHash,
    PasswordSalt,
    CreatedAt,
}

#[derive(Iden)]
pub enum Companies {
    Table,
    Id,
    Name,
    OwnerId,
    Address,
    Phone,
    Email,
    CreatedAt,
}

#[derive(Iden)]
pub enum Projects {
    Table,
    Id,
    CompanyId,
    Name,
    Description,
    Location,
    Budget,
    Status,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(Iden)]
pub enum ProjectMembers {
    Table,
    ProjectId,
    UserId,
    AddedAt,
}

#[derive(Iden)]
pub enum Tasks {
    Table,
    Id,
    ProjectId,
    Title,
    Description,
    AssignedTo,
    Status,
    Priority,
    DueDate,
    CreatedAt,
}

#[derive(Iden)]
pub enum Blueprints {
    Table,
    Id,
    ProjectId,
    Title,
    FileUrl,
    Version,
    UploadedBy,
    CreatedAt,
}

#[derive(Iden)]
pub enum Reports {
    Table,
    Id,
    ProjectId,
    AuthorId,
    Title,
    Date,
    Summary,
    Weather,
    Issues,
    CreatedAt,
}
