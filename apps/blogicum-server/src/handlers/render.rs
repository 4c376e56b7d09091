//! Domain to wire conversions.

use blogicum_core::domain::{AuthorSummary, Category, CommentView, Location, PostView, User};
use blogicum_core::pagination::Page;
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PostResponse,
    ProfileResponse,
};
use blogicum_shared::{PageMeta, PageResponse};

pub fn author(author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let PostView {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = view;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        is_published: post.is_published,
        image: post.image,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location),
        comment_count,
        created_at: post.created_at,
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        text: view.comment.text,
        author: author(view.author),
        created_at: view.comment.created_at,
    }
}

pub fn profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        display_name: user.display_name(),
        date_joined: user.created_at,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let meta = PageMeta {
        number: page.number,
        num_pages: page.num_pages,
        per_page: page.per_page,
        count: page.count,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    };

    PageResponse {
        items: page.items.into_iter().map(f).collect(),
        page: meta,
    }
}
