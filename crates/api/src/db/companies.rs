//! Company query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Query, SqliteQueryBuilder};
use sitework_core::{Company, NewCompany};

use super::Built;
use super::tables::Companies;

fn company_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.column(Companies::Id)
        .column(Companies::Name)
        .column(Companies::OwnerId)
        .column(Companies::Address)
        .column(Companies::Phone)
        .column(Companies::Email)
        .column(Companies::CreatedAt)
}

pub fn insert(id: &str, company: &NewCompany, created_at: &str) -> Built {
    Query::insert()
        .into_table(Companies::Table)
        .columns([
            Companies::Id,
            Companies::Name,
            Companies::OwnerId,
            Companies::Address,
            Companies::Phone,
            Companies::Email,
            Companies::CreatedAt,
        ])
        .values_panic([
            id.into(),
            company.name.as_str().into(),
            company.owner_id.as_str().into(),
            company.address.clone().into(),
            company.phone.clone().into(),
            company.email.clone().into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    company_columns(&mut q);
    q.from(Companies::Table)
        .and_where(Expr::col(Companies::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn exists(id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Companies::Table)
        .and_where(Expr::col(Companies::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Write back the mutable fields of `company`.
pub fn update(company: &Company) -> Built {
    Query::update()
        .table(Companies::Table)
        .value(Companies::Name, company.name.as_str())
        .value(Companies::Address, company.address.clone())
        .value(Companies::Phone, company.phone.clone())
        .value(Companies::Email, company.email.clone())
        .and_where(Expr::col(Companies::Id).eq(company.id.as_str()))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Companies::Table)
        .and_where(Expr::col(Companies::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Companies owned by a user.
pub fn count_owned_by(user_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Companies::Table)
        .and_where(Expr::col(Companies::OwnerId).eq(user_id))
        .build(SqliteQueryBuilder)
}
