//! Kindred Storage Layer
//!
//! Implements the `MemberStore` and `RelationStore` traits on SQLite.
//!
//! # Architecture
//!
//! - One `members` table keyed by a unique genealogy code
//! - One `member_social_networks` table, rewritten with its member on every upsert
//! - One `member_relations` table with a `UNIQUE(member_1_id, member_2_id, relation_type)`
//!   constraint, so a relation triple can never be stored twice
//! - Every upsert runs its lookup and write inside a single transaction
//!
//! # Examples
//!
//! ```no_run
//! use kindred_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for member and relation operations
//! ```

#![warn(missing_docs)]

use kindred_domain::traits::{
    MemberPage, MemberQuery, MemberStore, RelationStore, SortDirection, SortField,
};
use kindred_domain::{
    Address, Member, MemberId, MemberIndex, NewMember, RelationEdge, RelationId, RelationType,
    SocialNetwork, SocialNetworkType, Upserted,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Member or relation not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const MEMBER_COLUMNS: &str = "id, code, first_name, last_name, nick_name, birth_date, death_date, \
     phone_number, mobile_number, email, website, biography, \
     street, complement, postal_code, city, country";

const RELATION_COLUMNS: &str = "id, member_1_id, member_2_id, relation_type, rank";

/// SQLite-based implementation of the member and relation stores
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kindred_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("kindred.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored members
    pub fn member_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored relation edges
    pub fn relation_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM member_relations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get the code of a member, failing if it does not exist
    pub fn member_code(&self, id: MemberId) -> Result<String, StoreError> {
        self.conn
            .query_row(
                "SELECT code FROM members WHERE id = ?1",
                params![id.value()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("member {}", id)))
    }

    fn row_to_member(row: &Row<'_>) -> rusqlite::Result<Member> {
        let address = Address {
            street: row.get(12)?,
            complement: row.get(13)?,
            postal_code: row.get(14)?,
            city: row.get(15)?,
            country: row.get(16)?,
        };

        Ok(Member {
            id: MemberId::from_value(row.get(0)?),
            data: NewMember {
                code: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                nick_name: row.get(4)?,
                birth_date: row.get(5)?,
                death_date: row.get(6)?,
                phone_number: row.get(7)?,
                mobile_number: row.get(8)?,
                email: row.get(9)?,
                website: row.get(10)?,
                biography: row.get(11)?,
                address: if address.is_empty() { None } else { Some(address) },
                social_networks: Vec::new(),
            },
        })
    }

    /// Fill in the social networks of a member read by `row_to_member`
    fn with_social_networks(&self, mut member: Member) -> Result<Member, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT network_type, value FROM member_social_networks
             WHERE member_id = ?1 ORDER BY id",
        )?;
        member.data.social_networks = stmt
            .query_map(params![member.id.value()], |row| {
                let network_type: String = row.get(0)?;
                Ok(SocialNetwork {
                    network_type: SocialNetworkType::parse(&network_type),
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(member)
    }

    fn row_to_relation(row: &Row<'_>) -> rusqlite::Result<RelationEdge> {
        let type_str: String = row.get(3)?;
        let relation_type = RelationType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown relation type: {}",
                    type_str
                ))),
            )
        })?;

        Ok(RelationEdge {
            id: RelationId::from_value(row.get(0)?),
            member1: MemberId::from_value(row.get(1)?),
            member2: MemberId::from_value(row.get(2)?),
            relation_type,
            rank: row.get(4)?,
        })
    }

    fn sort_column(field: SortField) -> &'static str {
        match field {
            SortField::Code => "code",
            SortField::FirstName => "first_name",
            SortField::LastName => "last_name",
            SortField::BirthDate => "birth_date",
        }
    }
}

impl MemberStore for SqliteStore {
    type Error = StoreError;

    fn upsert_member(&mut self, member: NewMember) -> Result<Upserted<MemberId>, Self::Error> {
        let address = member.address.clone().unwrap_or_default();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM members WHERE code = ?1",
                params![&member.code],
                |row| row.get(0),
            )
            .optional()?;

        let upserted = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE members SET first_name = ?2, last_name = ?3, nick_name = ?4,
                     birth_date = ?5, death_date = ?6, phone_number = ?7, mobile_number = ?8,
                     email = ?9, website = ?10, biography = ?11, street = ?12, complement = ?13,
                     postal_code = ?14, city = ?15, country = ?16
                     WHERE id = ?1",
                    params![
                        id,
                        &member.first_name,
                        &member.last_name,
                        &member.nick_name,
                        &member.birth_date,
                        &member.death_date,
                        &member.phone_number,
                        &member.mobile_number,
                        &member.email,
                        &member.website,
                        &member.biography,
                        &address.street,
                        &address.complement,
                        &address.postal_code,
                        &address.city,
                        &address.country,
                    ],
                )?;
                Upserted::updated(MemberId::from_value(id))
            }
            None => {
                tx.execute(
                    "INSERT INTO members (code, first_name, last_name, nick_name, birth_date,
                     death_date, phone_number, mobile_number, email, website, biography,
                     street, complement, postal_code, city, country)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                    params![
                        &member.code,
                        &member.first_name,
                        &member.last_name,
                        &member.nick_name,
                        &member.birth_date,
                        &member.death_date,
                        &member.phone_number,
                        &member.mobile_number,
                        &member.email,
                        &member.website,
                        &member.biography,
                        &address.street,
                        &address.complement,
                        &address.postal_code,
                        &address.city,
                        &address.country,
                    ],
                )?;
                Upserted::created(MemberId::from_value(tx.last_insert_rowid()))
            }
        };

        tx.execute(
            "DELETE FROM member_social_networks WHERE member_id = ?1",
            params![upserted.id.value()],
        )?;
        for network in &member.social_networks {
            tx.execute(
                "INSERT INTO member_social_networks (member_id, network_type, value)
                 VALUES (?1, ?2, ?3)",
                params![upserted.id.value(), network.network_type.as_str(), &network.value],
            )?;
        }

        tx.commit()?;
        Ok(upserted)
    }

    fn get_member(&self, id: MemberId) -> Result<Option<Member>, Self::Error> {
        let sql = format!("SELECT {} FROM members WHERE id = ?1", MEMBER_COLUMNS);
        let member = self
            .conn
            .query_row(&sql, params![id.value()], Self::row_to_member)
            .optional()?;
        member.map(|m| self.with_social_networks(m)).transpose()
    }

    fn find_member_by_code(&self, code: &str) -> Result<Option<Member>, Self::Error> {
        let sql = format!("SELECT {} FROM members WHERE code = ?1", MEMBER_COLUMNS);
        let member = self
            .conn
            .query_row(&sql, params![code], Self::row_to_member)
            .optional()?;
        member.map(|m| self.with_social_networks(m)).transpose()
    }

    fn list_members(&self, query: &MemberQuery) -> Result<MemberPage, Self::Error> {
        if query.limit == 0 {
            return Err(StoreError::InvalidData("page limit must be greater than 0".to_string()));
        }

        let mut filter = String::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            filter.push_str(
                " WHERE (first_name LIKE ?1 OR last_name LIKE ?1 OR nick_name LIKE ?1
                  OR birth_date LIKE ?1 OR death_date LIKE ?1 OR email LIKE ?1
                  OR phone_number LIKE ?1 OR mobile_number LIKE ?1 OR street LIKE ?1
                  OR complement LIKE ?1 OR city LIKE ?1 OR country LIKE ?1
                  OR EXISTS (SELECT 1 FROM member_social_networks s
                             WHERE s.member_id = members.id AND s.value LIKE ?1))",
            );
            params.push(Box::new(format!("%{}%", search.trim())));
        }

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count_sql = format!("SELECT COUNT(*) FROM members{}", filter);
        let total: i64 = self
            .conn
            .query_row(&count_sql, &param_refs[..], |row| row.get(0))?;

        let direction = match query.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        let next = params.len() + 1;
        let sql = format!(
            "SELECT {} FROM members{} ORDER BY {} {}, id ASC LIMIT ?{} OFFSET ?{}",
            MEMBER_COLUMNS,
            filter,
            Self::sort_column(query.sort_by),
            direction,
            next,
            next + 1,
        );

        let limit = query.limit as i64;
        let offset = query.offset() as i64;
        let mut page_refs = param_refs.clone();
        page_refs.push(&limit);
        page_refs.push(&offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(&page_refs[..], Self::row_to_member)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|m| self.with_social_networks(m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MemberPage {
            items,
            total: total as usize,
            page: query.page,
            limit: query.limit,
        })
    }

    fn member_index(&self) -> Result<MemberIndex, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT code, id FROM members")?;
        let pairs = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, MemberId::from_value(row.get(1)?)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MemberIndex::from_pairs(pairs))
    }
}

impl RelationStore for SqliteStore {
    type Error = StoreError;

    fn find_relation(
        &self,
        member1: MemberId,
        member2: MemberId,
        relation_type: RelationType,
    ) -> Result<Option<RelationEdge>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM member_relations
             WHERE member_1_id = ?1 AND member_2_id = ?2 AND relation_type = ?3",
            RELATION_COLUMNS
        );
        let edge = self
            .conn
            .query_row(
                &sql,
                params![member1.value(), member2.value(), relation_type.as_str()],
                Self::row_to_relation,
            )
            .optional()?;
        Ok(edge)
    }

    fn upsert_relation(
        &mut self,
        member1: MemberId,
        member2: MemberId,
        relation_type: RelationType,
        rank: Option<u32>,
    ) -> Result<Upserted<RelationId>, Self::Error> {
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM member_relations
                 WHERE member_1_id = ?1 AND member_2_id = ?2 AND relation_type = ?3",
                params![member1.value(), member2.value(), relation_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let upserted = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE member_relations SET rank = ?2 WHERE id = ?1",
                    params![id, rank],
                )?;
                Upserted::updated(RelationId::from_value(id))
            }
            None => {
                tx.execute(
                    "INSERT INTO member_relations (member_1_id, member_2_id, relation_type, rank)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![member1.value(), member2.value(), relation_type.as_str(), rank],
                )?;
                Upserted::created(RelationId::from_value(tx.last_insert_rowid()))
            }
        };

        tx.commit()?;
        Ok(upserted)
    }

    fn relations_of(&self, member: MemberId) -> Result<Vec<RelationEdge>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM member_relations
             WHERE member_1_id = ?1 OR member_2_id = ?1
             ORDER BY id",
            RELATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let edges = stmt
            .query_map(params![member.value()], Self::row_to_relation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }
}
