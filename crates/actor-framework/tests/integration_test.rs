use actor_framework::{ActorEntity, Filter, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Shelf {
    id: u32,
    aisle: String,
    capacity: u32,
    locked: bool,
}

#[derive(Debug)]
struct ShelfCreate {
    aisle: String,
    capacity: u32,
}

#[derive(Debug, Clone)]
struct ShelfUpdate {
    capacity: Option<u32>,
}

#[derive(Debug)]
enum ShelfAction {
    Lock,
}

#[derive(Debug, thiserror::Error)]
enum ShelfError {
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("shelf is locked")]
    Locked,
}

#[async_trait]
impl ActorEntity for Shelf {
    type Id = u32;
    type Create = ShelfCreate;
    type Update = ShelfUpdate;
    type Action = ShelfAction;
    type ActionResult = bool;
    type Context = ();
    type Error = ShelfError;

    fn from_create_params(id: u32, params: ShelfCreate) -> Result<Self, Self::Error> {
        if params.capacity == 0 {
            return Err(ShelfError::ZeroCapacity);
        }
        Ok(Self {
            id,
            aisle: params.aisle,
            capacity: params.capacity,
            locked: false,
        })
    }

    async fn on_update(&mut self, update: ShelfUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if self.locked {
            return Err(ShelfError::Locked);
        }
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: ShelfAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            ShelfAction::Lock => {
                let changed = !self.locked;
                self.locked = true;
                Ok(changed)
            }
        }
    }
}

fn counter() -> impl FnMut() -> u32 + Send + 'static {
    let mut next = 0;
    move || {
        next += 1;
        next
    }
}

fn shelf(aisle: &str, capacity: u32) -> ShelfCreate {
    ShelfCreate {
        aisle: aisle.into(),
        capacity,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Shelf>::new(10, counter());
    let handle = tokio::spawn(actor.run(()));

    let id = client.create(shelf("A", 10)).await.unwrap();
    assert_eq!(id, 1);

    let changed = client.perform_action(id, ShelfAction::Lock).await.unwrap();
    assert!(changed);
    let changed_again = client.perform_action(id, ShelfAction::Lock).await.unwrap();
    assert!(!changed_again);

    let rejected = client.update(id, ShelfUpdate { capacity: Some(3) }).await;
    assert!(matches!(rejected, Err(FrameworkError::EntityError(_))));

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());

    let missing = client.delete(id).await;
    assert!(matches!(missing, Err(FrameworkError::NotFound(_))));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_create_batch_is_all_or_nothing() {
    let (actor, client) = ResourceActor::<Shelf>::new(10, counter());
    tokio::spawn(actor.run(()));

    let ids = client
        .create_batch(vec![shelf("A", 1), shelf("B", 2)])
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let rejected = client
        .create_batch(vec![shelf("C", 4), shelf("D", 0), shelf("E", 5)])
        .await;
    match rejected {
        Err(FrameworkError::BatchRejected { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected BatchRejected, got {other:?}"),
    }

    let all = client.list(Filter::all()).await.unwrap();
    assert_eq!(all.len(), 2, "rejected batch must not leave partial entities");
    assert!(all.iter().all(|s| s.aisle == "A" || s.aisle == "B"));
}

#[tokio::test]
async fn test_update_where_commits_every_match_or_none() {
    let (actor, client) = ResourceActor::<Shelf>::new(10, counter());
    tokio::spawn(actor.run(()));

    let ids = client
        .create_batch(vec![shelf("A", 1), shelf("A", 2), shelf("B", 3)])
        .await
        .unwrap();

    let updated = client
        .update_where(
            Filter::new(|s: &Shelf| s.aisle == "A"),
            ShelfUpdate { capacity: Some(9) },
        )
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|s| s.capacity == 9));

    // Lock one shelf in aisle A; the next aisle-wide update must be rejected as a whole.
    client.perform_action(ids[0], ShelfAction::Lock).await.unwrap();
    let rejected = client
        .update_where(
            Filter::new(|s: &Shelf| s.aisle == "A"),
            ShelfUpdate { capacity: Some(1) },
        )
        .await;
    assert!(matches!(rejected, Err(FrameworkError::BatchRejected { .. })));

    let aisle_a = client
        .list(Filter::new(|s: &Shelf| s.aisle == "A"))
        .await
        .unwrap();
    assert!(aisle_a.iter().all(|s| s.capacity == 9));

    let none = client
        .update_where(
            Filter::new(|s: &Shelf| s.aisle == "Z"),
            ShelfUpdate { capacity: Some(1) },
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}
