//! In-memory adapter used by the HTTP tests.
//!
//! One [`MemoryDatabase`] implements every repository trait over plain
//! vectors behind a mutex, mirroring the unique constraints and tenant
//! scoping of the SQL schema.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    CategoryRepository, CouponRepository, OrderRepository, PlatformRepository, ProductRepository,
    RepoError, RepoResult, StoreRepository, UserRepository,
};
use crate::{
    config::SessionLifetimes,
    models::{
        Page,
        category::{Category, CategoryStats},
        coupon::Coupon,
        order::{
            Order, OrderDetails, OrderItem, OrderStatRow, OrderStatus, PaymentStatus, PlaceOrder,
            PricingError, Summary, price_order,
        },
        product::{Product, ProductAttribute, ProductStats, PublicProduct},
        session::{Session, SessionTokens},
        settings::{Settings, SettingsChanges},
        store::{Staff, StaffPermission, StaffProfile, Store, StoreUserProfile},
        user::{ADMIN_GROUP_ID, AuthUser, Permission, ProfileChanges, USER_GROUP_ID, User, UserStatus},
    },
};

#[derive(Debug, Default)]
struct Tables {
    settings: Option<Settings>,
    permissions: HashMap<Uuid, Permission>,
    users: Vec<User>,
    sessions: Vec<Session>,
    stores: Vec<Store>,
    staff: Vec<Staff>,
    categories: Vec<Category>,
    products: Vec<Product>,
    attributes: Vec<ProductAttribute>,
    coupons: Vec<Coupon>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

fn duplicate(constraint: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: constraint.to_string(),
    }
}

fn matches(query: Option<&str>, fields: &[&str]) -> bool {
    match query {
        None => true,
        Some(q) => {
            let q = q.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&q))
        }
    }
}

/// Newest first, like the SQL listings.
fn newest_first<T: Clone>(rows: impl DoubleEndedIterator<Item = T>, page: Page) -> Vec<T> {
    page.slice(rows.rev())
}

impl Tables {
    fn store_active(&self, store_id: Uuid) -> bool {
        self.stores.iter().any(|s| s.id == store_id && s.is_active)
    }

    fn public(&self, product: &Product) -> Option<PublicProduct> {
        if !product.is_published {
            return None;
        }
        let store = self.stores.iter().find(|s| s.id == product.store_id && s.is_active)?;
        let category_name = product.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
        });
        Some(PublicProduct::from_product(product, &store.name, category_name))
    }

    fn check_product(&self, product: &Product) -> RepoResult<()> {
        if let Some(category_id) = product.category_id {
            let same_store = self
                .categories
                .iter()
                .any(|c| c.id == category_id && c.store_id == product.store_id);
            if !same_store {
                return Err(RepoError::rejected("category_id", "category does not exist in this store"));
            }
        }

        let sku_taken = self
            .products
            .iter()
            .any(|p| p.id != product.id && p.store_id == product.store_id && p.sku == product.sku);
        if sku_taken {
            return Err(duplicate("products_store_id_sku_key"));
        }

        Ok(())
    }

    fn details(&self, order: &Order) -> OrderDetails {
        OrderDetails {
            order: order.clone(),
            items: self.items.iter().filter(|i| i.order_id == order.id).cloned().collect(),
        }
    }
}

#[derive(Debug)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    /// Empty database with default settings and both permission groups.
    pub fn new() -> Self {
        let tables = Tables {
            settings: Some(Settings::initial(Utc::now())),
            permissions: HashMap::from([
                (ADMIN_GROUP_ID, Permission::Admin),
                (USER_GROUP_ID, Permission::User),
            ]),
            ..Default::default()
        };

        Self {
            tables: Mutex::new(tables),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Stock of a product, for assertions.
    pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.tables()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock)
    }

    /// Backdate an order, for stats tests.
    pub fn set_order_created_at(&self, order_id: Uuid, created_at: DateTime<Utc>) {
        let mut t = self.tables();
        if let Some(order) = t.orders.iter_mut().find(|o| o.id == order_id) {
            order.created_at = created_at;
        }
    }
}

#[async_trait]
impl PlatformRepository for MemoryDatabase {
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }

    async fn settings(&self) -> RepoResult<Settings> {
        self.tables().settings.clone().ok_or(RepoError::NotFound)
    }

    async fn update_settings(&self, changes: SettingsChanges, now: DateTime<Utc>) -> RepoResult<Settings> {
        let mut t = self.tables();
        let settings = t.settings.as_mut().ok_or(RepoError::NotFound)?;
        settings.apply(changes, now);
        Ok(settings.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn register(&self, user: &User) -> RepoResult<()> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate("users_email_key"));
        }
        t.users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<User> {
        let t = self.tables();
        t.users.iter().find(|u| u.email == email).cloned().ok_or(RepoError::NotFound)
    }

    async fn get(&self, user_id: Uuid) -> RepoResult<User> {
        let t = self.tables();
        t.users.iter().find(|u| u.id == user_id).cloned().ok_or(RepoError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> RepoResult<User> {
        let mut t = self.tables();
        let user = t.users.iter_mut().find(|u| u.id == user_id).ok_or(RepoError::NotFound)?;
        user.apply(changes, now);
        Ok(user.clone())
    }

    async fn authenticate(&self, access_token_hash: &str, now: DateTime<Utc>) -> RepoResult<AuthUser> {
        let t = self.tables();
        let session = t
            .sessions
            .iter()
            .find(|s| s.access_token_hash == access_token_hash && s.access_expires_at > now)
            .ok_or(RepoError::NotFound)?;
        let user = t
            .users
            .iter()
            .find(|u| u.id == session.user_id && u.status == UserStatus::Active)
            .ok_or(RepoError::NotFound)?;
        let permission = *t.permissions.get(&user.permission_id).ok_or(RepoError::NotFound)?;

        Ok(AuthUser {
            user_id: user.id,
            permission,
        })
    }

    async fn create_session(&self, session: &Session) -> RepoResult<()> {
        self.tables().sessions.push(session.clone());
        Ok(())
    }

    async fn delete_session(&self, access_token_hash: &str) -> RepoResult<()> {
        self.tables()
            .sessions
            .retain(|s| s.access_token_hash != access_token_hash);
        Ok(())
    }

    async fn refresh_session(
        &self,
        refresh_token_hash: &str,
        lifetimes: SessionLifetimes,
        now: DateTime<Utc>,
    ) -> RepoResult<SessionTokens> {
        let mut t = self.tables();
        let index = t
            .sessions
            .iter()
            .position(|s| s.refresh_token_hash == refresh_token_hash && s.refresh_expires_at > now)
            .ok_or(RepoError::NotFound)?;

        let old = t.sessions.remove(index);
        let (session, tokens) = Session::issue(old.user_id, lifetimes, now);
        t.sessions.push(session);

        Ok(tokens)
    }
}

#[async_trait]
impl StoreRepository for MemoryDatabase {
    async fn create_with_owner(&self, store: &Store, owner_id: Uuid) -> RepoResult<()> {
        let mut t = self.tables();
        if t.stores.iter().any(|s| s.name == store.name) {
            return Err(duplicate("stores_name_key"));
        }
        if t.staff.iter().any(|s| s.user_id == owner_id) {
            return Err(duplicate("store_staffs_user_id_key"));
        }

        t.stores.push(store.clone());
        t.staff.push(Staff {
            store_id: store.id,
            user_id: owner_id,
            permission: StaffPermission::Owner,
            created_at: store.created_at,
        });
        Ok(())
    }

    async fn get(&self, store_id: Uuid) -> RepoResult<Store> {
        let t = self.tables();
        t.stores.iter().find(|s| s.id == store_id).cloned().ok_or(RepoError::NotFound)
    }

    async fn set_active(&self, store_id: Uuid, is_active: bool, now: DateTime<Utc>) -> RepoResult<Store> {
        let mut t = self.tables();
        let store = t.stores.iter_mut().find(|s| s.id == store_id).ok_or(RepoError::NotFound)?;
        store.is_active = is_active;
        store.updated_at = now;
        Ok(store.clone())
    }

    async fn staff_profile(&self, user_id: Uuid) -> RepoResult<StaffProfile> {
        let t = self.tables();
        let staff = t.staff.iter().find(|s| s.user_id == user_id).ok_or(RepoError::NotFound)?;

        Ok(StaffProfile {
            store_id: staff.store_id,
            user_id: staff.user_id,
            permission: staff.permission,
            is_store_active: t.store_active(staff.store_id),
        })
    }

    async fn is_staff(&self, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.tables().staff.iter().any(|s| s.user_id == user_id))
    }

    async fn add_staff(&self, staff: &Staff) -> RepoResult<()> {
        let mut t = self.tables();
        if t.staff.iter().any(|s| s.user_id == staff.user_id) {
            return Err(duplicate("store_staffs_user_id_key"));
        }
        t.staff.push(staff.clone());
        Ok(())
    }

    async fn list_staff(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<StoreUserProfile>> {
        let t = self.tables();
        let profiles = t
            .staff
            .iter()
            .filter(|s| s.store_id == store_id)
            .filter_map(|s| {
                let user = t.users.iter().find(|u| u.id == s.user_id)?;
                matches(query, &[&user.name, &user.email]).then(|| StoreUserProfile {
                    user_id: user.id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    phone: user.phone.clone(),
                    profile_picture: user.profile_picture.clone(),
                    permission: s.permission,
                })
            });

        Ok(page.slice(profiles))
    }

    async fn update_staff_permission(
        &self,
        store_id: Uuid,
        user_id: Uuid,
        permission: StaffPermission,
    ) -> RepoResult<()> {
        let mut t = self.tables();
        let staff = t
            .staff
            .iter_mut()
            .find(|s| s.store_id == store_id && s.user_id == user_id && s.permission != StaffPermission::Owner)
            .ok_or(RepoError::NotFound)?;
        staff.permission = permission;
        Ok(())
    }

    async fn delete_staff(&self, store_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let mut t = self.tables();
        let index = t
            .staff
            .iter()
            .position(|s| s.store_id == store_id && s.user_id == user_id && s.permission != StaffPermission::Owner)
            .ok_or(RepoError::NotFound)?;
        t.staff.remove(index);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryDatabase {
    async fn create(&self, product: &Product) -> RepoResult<()> {
        let mut t = self.tables();
        t.check_product(product)?;
        t.products.push(product.clone());
        Ok(())
    }

    async fn get(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<Product> {
        let t = self.tables();
        t.products
            .iter()
            .find(|p| p.id == product_id && p.store_id == store_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn details(&self, product_id: Uuid) -> RepoResult<PublicProduct> {
        let t = self.tables();
        t.products
            .iter()
            .find(|p| p.id == product_id)
            .and_then(|p| t.public(p))
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, product: &Product) -> RepoResult<()> {
        let mut t = self.tables();
        t.check_product(product)?;
        let slot = t
            .products
            .iter_mut()
            .find(|p| p.id == product.id && p.store_id == product.store_id)
            .ok_or(RepoError::NotFound)?;
        *slot = product.clone();
        Ok(())
    }

    async fn delete(&self, store_id: Uuid, product_id: Uuid) -> RepoResult<()> {
        let mut t = self.tables();
        let index = t
            .products
            .iter()
            .position(|p| p.id == product_id && p.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        t.products.remove(index);
        t.attributes.retain(|a| a.product_id != product_id);
        for item in t.items.iter_mut().filter(|i| i.product_id == Some(product_id)) {
            item.product_id = None;
        }
        Ok(())
    }

    async fn list(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<PublicProduct>> {
        let t = self.tables();
        let products: Vec<PublicProduct> = t
            .products
            .iter()
            .filter(|p| matches(query, &[&p.name, &p.sku]))
            .filter_map(|p| t.public(p))
            .collect();
        Ok(newest_first(products.into_iter(), page))
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        query: Option<&str>,
        page: Page,
    ) -> RepoResult<Vec<Product>> {
        let t = self.tables();
        let products: Vec<Product> = t
            .products
            .iter()
            .filter(|p| p.store_id == store_id && matches(query, &[&p.name, &p.sku]))
            .cloned()
            .collect();
        Ok(newest_first(products.into_iter(), page))
    }

    async fn attributes(&self, product_id: Uuid) -> RepoResult<Vec<ProductAttribute>> {
        let t = self.tables();
        let mut attributes: Vec<ProductAttribute> = t
            .attributes
            .iter()
            .filter(|a| a.product_id == product_id)
            .cloned()
            .collect();
        attributes.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(attributes)
    }

    async fn add_attribute(&self, store_id: Uuid, attribute: &ProductAttribute) -> RepoResult<()> {
        let mut t = self.tables();
        if !t.products.iter().any(|p| p.id == attribute.product_id && p.store_id == store_id) {
            return Err(RepoError::NotFound);
        }
        if t
            .attributes
            .iter()
            .any(|a| a.product_id == attribute.product_id && a.key == attribute.key)
        {
            return Err(duplicate("product_attributes_pkey"));
        }
        t.attributes.push(attribute.clone());
        Ok(())
    }

    async fn remove_attribute(&self, store_id: Uuid, product_id: Uuid, key: &str) -> RepoResult<()> {
        let mut t = self.tables();
        if !t.products.iter().any(|p| p.id == product_id && p.store_id == store_id) {
            return Err(RepoError::NotFound);
        }
        let index = t
            .attributes
            .iter()
            .position(|a| a.product_id == product_id && a.key == key)
            .ok_or(RepoError::NotFound)?;
        t.attributes.remove(index);
        Ok(())
    }

    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<ProductStats>> {
        let t = self.tables();
        let mut stats: Vec<ProductStats> = t
            .products
            .iter()
            .filter(|p| match store_id {
                Some(id) => p.store_id == id,
                None => p.is_published && t.store_active(p.store_id),
            })
            .map(|p| {
                let lines: Vec<&OrderItem> =
                    t.items.iter().filter(|i| i.product_id == Some(p.id)).collect();
                let orders: HashSet<Uuid> = lines.iter().map(|i| i.order_id).collect();
                ProductStats {
                    id: p.id,
                    name: p.name.clone(),
                    number_of_orders: orders.len() as i64,
                    quantity_sold: lines.iter().map(|i| i64::from(i.quantity)).sum(),
                }
            })
            .collect();

        stats.sort_by(|a, b| {
            b.number_of_orders
                .cmp(&a.number_of_orders)
                .then(b.quantity_sold.cmp(&a.quantity_sold))
                .then(a.name.cmp(&b.name))
        });
        stats.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(stats)
    }
}

#[async_trait]
impl CategoryRepository for MemoryDatabase {
    async fn create(&self, category: &Category) -> RepoResult<()> {
        let mut t = self.tables();
        if t
            .categories
            .iter()
            .any(|c| c.store_id == category.store_id && c.name == category.name)
        {
            return Err(duplicate("categories_store_id_name_key"));
        }
        t.categories.push(category.clone());
        Ok(())
    }

    async fn get(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<Category> {
        let t = self.tables();
        t.categories
            .iter()
            .find(|c| c.id == category_id && c.store_id == store_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, category: &Category) -> RepoResult<()> {
        let mut t = self.tables();
        if t.categories.iter().any(|c| {
            c.id != category.id && c.store_id == category.store_id && c.name == category.name
        }) {
            return Err(duplicate("categories_store_id_name_key"));
        }
        let slot = t
            .categories
            .iter_mut()
            .find(|c| c.id == category.id && c.store_id == category.store_id)
            .ok_or(RepoError::NotFound)?;
        *slot = category.clone();
        Ok(())
    }

    async fn delete(&self, store_id: Uuid, category_id: Uuid) -> RepoResult<()> {
        let mut t = self.tables();
        let index = t
            .categories
            .iter()
            .position(|c| c.id == category_id && c.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        t.categories.remove(index);
        for product in t.products.iter_mut().filter(|p| p.category_id == Some(category_id)) {
            product.category_id = None;
        }
        Ok(())
    }

    async fn list(&self, store_id: Option<Uuid>, page: Page) -> RepoResult<Vec<Category>> {
        let t = self.tables();
        let mut categories: Vec<Category> = t
            .categories
            .iter()
            .filter(|c| match store_id {
                Some(id) => c.store_id == id,
                None => t.store_active(c.store_id),
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(categories))
    }

    async fn stats(&self, store_id: Option<Uuid>, limit: i64) -> RepoResult<Vec<CategoryStats>> {
        let t = self.tables();
        let mut stats: Vec<CategoryStats> = t
            .categories
            .iter()
            .filter(|c| match store_id {
                Some(id) => c.store_id == id,
                None => t.store_active(c.store_id),
            })
            .map(|c| CategoryStats {
                id: c.id,
                name: c.name.clone(),
                number_of_products: t
                    .products
                    .iter()
                    .filter(|p| p.category_id == Some(c.id))
                    .count() as i64,
            })
            .collect();

        stats.sort_by(|a, b| {
            b.number_of_products
                .cmp(&a.number_of_products)
                .then(a.name.cmp(&b.name))
        });
        stats.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(stats)
    }
}

#[async_trait]
impl CouponRepository for MemoryDatabase {
    async fn create(&self, coupon: &Coupon) -> RepoResult<()> {
        let mut t = self.tables();
        if t.coupons.iter().any(|c| c.store_id == coupon.store_id && c.code == coupon.code) {
            return Err(duplicate("coupons_store_id_code_key"));
        }
        t.coupons.push(coupon.clone());
        Ok(())
    }

    async fn get(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<Coupon> {
        let t = self.tables();
        t.coupons
            .iter()
            .find(|c| c.id == coupon_id && c.store_id == store_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_code(&self, store_id: Uuid, code: &str) -> RepoResult<Coupon> {
        let t = self.tables();
        t.coupons
            .iter()
            .find(|c| c.store_id == store_id && c.code == code)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn update(&self, coupon: &Coupon) -> RepoResult<()> {
        let mut t = self.tables();
        if t.coupons.iter().any(|c| {
            c.id != coupon.id && c.store_id == coupon.store_id && c.code == coupon.code
        }) {
            return Err(duplicate("coupons_store_id_code_key"));
        }
        let slot = t
            .coupons
            .iter_mut()
            .find(|c| c.id == coupon.id && c.store_id == coupon.store_id)
            .ok_or(RepoError::NotFound)?;
        *slot = coupon.clone();
        Ok(())
    }

    async fn delete(&self, store_id: Uuid, coupon_id: Uuid) -> RepoResult<()> {
        let mut t = self.tables();
        let index = t
            .coupons
            .iter()
            .position(|c| c.id == coupon_id && c.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        t.coupons.remove(index);
        Ok(())
    }

    async fn list(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Coupon>> {
        let t = self.tables();
        let coupons: Vec<Coupon> = t.coupons.iter().filter(|c| c.store_id == store_id).cloned().collect();
        Ok(newest_first(coupons.into_iter(), page))
    }
}

#[async_trait]
impl OrderRepository for MemoryDatabase {
    async fn place(&self, user_id: Uuid, request: &PlaceOrder, now: DateTime<Utc>) -> RepoResult<OrderDetails> {
        let mut t = self.tables();

        let wanted: HashSet<Uuid> = request.product_ids().into_iter().collect();
        let products: HashMap<Uuid, Product> = t
            .products
            .iter()
            .filter(|p| wanted.contains(&p.id) && t.store_active(p.store_id))
            .map(|p| (p.id, p.clone()))
            .collect();

        let mut pricing = price_order(&request.lines, &products, None, now)?;

        let coupon_id = match &request.coupon_code {
            Some(code) => {
                let coupon = t
                    .coupons
                    .iter()
                    .find(|c| c.store_id == pricing.store_id && &c.code == code)
                    .cloned()
                    .ok_or(PricingError::CouponUnavailable)?;
                pricing = price_order(&request.lines, &products, Some(&coupon), now)?;
                Some(coupon.id)
            }
            None => None,
        };

        // Nothing is written before pricing succeeded
        for line in &pricing.items {
            if let Some(product) = t.products.iter_mut().find(|p| p.id == line.product_id) {
                product.stock -= line.quantity;
            }
        }
        if let Some(id) = coupon_id {
            if let Some(coupon) = t.coupons.iter_mut().find(|c| c.id == id) {
                coupon.usage_count += 1;
            }
        }

        let details = OrderDetails::placed(user_id, request, pricing, coupon_id, now);
        t.orders.push(details.order.clone());
        t.items.extend(details.items.iter().cloned());

        Ok(details)
    }

    async fn get_for_user(&self, user_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails> {
        let t = self.tables();
        t.orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .map(|o| t.details(o))
            .ok_or(RepoError::NotFound)
    }

    async fn get_for_store(&self, store_id: Uuid, order_id: Uuid) -> RepoResult<OrderDetails> {
        let t = self.tables();
        t.orders
            .iter()
            .find(|o| o.id == order_id && o.store_id == store_id)
            .map(|o| t.details(o))
            .ok_or(RepoError::NotFound)
    }

    async fn list_for_user(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<Order>> {
        let t = self.tables();
        let orders: Vec<Order> = t.orders.iter().filter(|o| o.user_id == user_id).cloned().collect();
        Ok(newest_first(orders.into_iter(), page))
    }

    async fn list_for_store(&self, store_id: Uuid, page: Page) -> RepoResult<Vec<Order>> {
        let t = self.tables();
        let orders: Vec<Order> = t.orders.iter().filter(|o| o.store_id == store_id).cloned().collect();
        Ok(newest_first(orders.into_iter(), page))
    }

    async fn update_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let mut t = self.tables();
        let order = t
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        if order.status.is_terminal() {
            return Err(RepoError::rejected("status", "order status can no longer change"));
        }
        order.status = status;
        order.updated_at = now;
        Ok(order.clone())
    }

    async fn update_payment_status(
        &self,
        store_id: Uuid,
        order_id: Uuid,
        payment_status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let mut t = self.tables();
        let order = t
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.store_id == store_id)
            .ok_or(RepoError::NotFound)?;
        order.payment_status = payment_status;
        order.updated_at = now;
        Ok(order.clone())
    }

    async fn summary(&self, store_id: Uuid) -> RepoResult<Summary> {
        let t = self.tables();
        let rows: Vec<OrderStatRow> = t
            .orders
            .iter()
            .filter(|o| o.store_id == store_id)
            .map(OrderStatRow::from)
            .collect();
        let refs: Vec<&OrderStatRow> = rows.iter().collect();
        Ok(Summary::for_rows(&refs))
    }

    async fn stat_rows(
        &self,
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<OrderStatRow>> {
        let t = self.tables();
        Ok(t.orders
            .iter()
            .filter(|o| o.store_id == store_id && from <= o.created_at && o.created_at < to)
            .map(OrderStatRow::from)
            .collect())
    }
}
