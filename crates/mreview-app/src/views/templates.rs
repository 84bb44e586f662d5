use once_cell::sync::Lazy;
use tera::Tera;

/// Templates are compiled into the binary
pub(super) static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
        ("movies/index.html", INDEX_TEMPLATE),
        ("movies/form.html", FORM_TEMPLATE),
        ("movies/details.html", DETAILS_TEMPLATE),
        ("movies/delete.html", DELETE_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Movies Review{% endblock %}</title>
    <style>
        * { box-sizing: border-box; }
        body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
        a { color: #0d6efd; text-decoration: none; }
        .header { background: #212529; padding: 14px 32px; }
        .header a { color: #fff; font-weight: 600; margin-right: 24px; }
        .container { max-width: 1100px; margin: 24px auto; padding: 0 16px; }
        .btn { display: inline-block; padding: 6px 14px; border-radius: 4px; border: 1px solid transparent; cursor: pointer; font-size: 14px; }
        .btn-primary { background: #0d6efd; color: #fff; }
        .btn-secondary { background: #6c757d; color: #fff; }
        .btn-danger { background: #dc3545; color: #fff; }
        .card { background: #fff; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,.1); padding: 16px; margin-bottom: 16px; }
        .movie { display: flex; gap: 16px; }
        .movie img { width: 120px; height: 170px; object-fit: cover; border-radius: 4px; }
        .field { margin-bottom: 14px; }
        .field label { display: block; font-weight: 600; margin-bottom: 4px; }
        .field input, .field select, .field textarea { width: 100%; padding: 6px; }
        .field-error { color: #dc3545; font-size: 13px; }
        .poster-preview { max-width: 200px; display: block; margin-top: 8px; }
        #toasts { position: fixed; top: 16px; right: 16px; z-index: 1000; }
        .toast { position: relative; min-width: 260px; padding: 12px 36px 16px 16px; margin-bottom: 8px; border-radius: 4px; color: #fff; overflow: hidden; }
        .toast-success { background: #51a351; }
        .toast .close { position: absolute; top: 6px; right: 10px; background: none; border: none; color: #fff; font-size: 18px; cursor: pointer; }
        .toast .progress { position: absolute; left: 0; bottom: 0; height: 4px; background: rgba(0,0,0,.3); width: 100%; transition: width 5s linear; }
    </style>
</head>
<body>
    <div class="header">
        <a href="/movies">Movies Review</a>
        <a href="/movies/create">Add movie</a>
    </div>
    <div id="toasts">
        {% for toast in toasts %}
        <div class="toast toast-{{ toast.kind }}">
            <button class="close" type="button" onclick="this.parentElement.remove()">&times;</button>
            {{ toast.message }}
            <div class="progress"></div>
        </div>
        {% endfor %}
    </div>
    <div class="container">
        {% block content %}{% endblock %}
    </div>
    <script>
        document.querySelectorAll("#toasts .toast").forEach(function (toast) {
            var bar = toast.querySelector(".progress");
            requestAnimationFrame(function () { bar.style.width = "0"; });
            setTimeout(function () { toast.remove(); }, 5000);
        });
    </script>
    {% block scripts %}{% endblock %}
</body>
</html>"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ status }} {{ reason }} - Movies Review{% endblock %}
{% block content %}
<div class="card">
    <h1>{{ status }} {{ reason }}</h1>
    <p>{{ message }}</p>
    <a href="/movies" class="btn btn-secondary">Back to movies</a>
</div>
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<h1>Movies</h1>
<p><a href="/movies/create" class="btn btn-primary">Add movie</a></p>
{% if movies %}
{% for movie in movies %}
<div class="card movie" id="movie-{{ movie.id }}">
    <img src="/movies/poster/{{ movie.id }}" alt="{{ movie.title }}">
    <div>
        <h3><a href="/movies/details/{{ movie.id }}">{{ movie.title }}</a> ({{ movie.year }})</h3>
        <p>Rating: {{ movie.rate }} / 10</p>
        <p>{{ movie.synopsis | truncate(length=250) }}</p>
        <a href="/movies/details/{{ movie.id }}" class="btn btn-secondary">Details</a>
        <a href="/movies/edit/{{ movie.id }}" class="btn btn-primary">Edit</a>
        <a href="/movies/delete/{{ movie.id }}" class="btn btn-danger">Delete</a>
    </div>
</div>
{% endfor %}
{% else %}
<div class="card">No movies found</div>
{% endif %}
{% endblock %}"##;

const FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{% if form.id %}Edit{% else %}Create{% endif %} movie - Movies Review{% endblock %}
{% block content %}
<h1>{% if form.id %}Edit{% else %}Create{% endif %} movie</h1>
<form class="card" method="post" enctype="multipart/form-data"
      action="{% if form.id %}/movies/edit{% else %}/movies/create{% endif %}">
    {% if form.id %}
    <input type="hidden" name="id" value="{{ form.id }}">
    <input type="hidden" name="version" value="{{ form.version }}">
    {% endif %}
    <div class="field">
        <label for="title">Title</label>
        <input id="title" name="title" maxlength="250" value="{{ form.title }}">
        {% for e in errors.title %}<div class="field-error">{{ e }}</div>{% endfor %}
    </div>
    <div class="field">
        <label for="genre_id">Genre</label>
        <select id="genre_id" name="genre_id">
            <option value="">Select genre</option>
            {% for genre in genres %}
            <option value="{{ genre.id }}" {% if genre.selected %}selected{% endif %}>{{ genre.name }}</option>
            {% endfor %}
        </select>
        {% for e in errors.genre_id %}<div class="field-error">{{ e }}</div>{% endfor %}
    </div>
    <div class="field">
        <label for="year">Year</label>
        <input id="year" name="year" type="number" value="{{ form.year }}">
        {% for e in errors.year %}<div class="field-error">{{ e }}</div>{% endfor %}
    </div>
    <div class="field">
        <label for="rate">Rate</label>
        <input id="rate" name="rate" type="number" min="1" max="10" step="0.1" value="{{ form.rate }}">
        {% for e in errors.rate %}<div class="field-error">{{ e }}</div>{% endfor %}
    </div>
    <div class="field">
        <label for="synopsis">Synopsis</label>
        <textarea id="synopsis" name="synopsis" rows="6" maxlength="2500">{{ form.synopsis }}</textarea>
        {% for e in errors.synopsis %}<div class="field-error">{{ e }}</div>{% endfor %}
    </div>
    <div class="field">
        <label for="poster">Select poster</label>
        <input id="poster" name="poster" type="file" accept=".jpg,.png">
        {% for e in errors.poster %}<div class="field-error">{{ e }}</div>{% endfor %}
        {% if poster_preview %}<img class="poster-preview" src="{{ poster_preview | safe }}" alt="Current poster">{% endif %}
    </div>
    <button type="submit" class="btn btn-primary">Save</button>
    <a href="/movies" class="btn btn-secondary">Cancel</a>
</form>
{% endblock %}"##;

const DETAILS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ movie.title }} - Movies Review{% endblock %}
{% block content %}
<div class="card movie">
    <img src="/movies/poster/{{ movie.id }}" alt="{{ movie.title }}">
    <div>
        <h1>{{ movie.title }}</h1>
        <p>Genre: {{ movie.genre.name }}</p>
        <p>Year: {{ movie.year }}</p>
        <p>Rating: {{ movie.rate }} / 10</p>
        <p>{{ movie.synopsis }}</p>
        <a href="/movies/edit/{{ movie.id }}" class="btn btn-primary">Edit</a>
        <a href="/movies" class="btn btn-secondary">Back to list</a>
    </div>
</div>
{% endblock %}"##;

const DELETE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Delete {{ movie.title }} - Movies Review{% endblock %}
{% block content %}
<div class="card">
    <h1>Delete movie</h1>
    <p>Do you really want to delete <strong>{{ movie.title }}</strong> ({{ movie.year }})?</p>
    <form id="delete-form" method="post" action="/movies/delete/{{ movie.id }}">
        <button type="submit" class="btn btn-danger">Delete</button>
        <a href="/movies" class="btn btn-secondary">Cancel</a>
    </form>
    <p id="delete-error" class="field-error"></p>
</div>
{% endblock %}
{% block scripts %}
<script>
    document.getElementById("delete-form").addEventListener("submit", function (event) {
        event.preventDefault();
        fetch(this.action, { method: "POST" }).then(function (response) {
            if (response.ok) {
                window.location.href = "/movies";
            } else {
                document.getElementById("delete-error").textContent = "Delete failed: " + response.status;
            }
        });
    });
</script>
{% endblock %}"##;
